//! Argument splitting for command lines
//!
//! Each argument is a view of the line starting at that word and running to
//! the end of the line. Verbs only ever look at the first byte of an
//! argument, and the last argument doubles as free text (`message set`).

/// Maximum number of arguments looked at in one command line
pub const MAX_ARGS: usize = 5;

/// The split arguments of one command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Args<'a> {
    argv: [&'a str; MAX_ARGS],
    argc: usize,
}

impl<'a> Args<'a> {
    /// Split a command line into at most [`MAX_ARGS`] arguments
    ///
    /// The first argument starts at byte 0, so a line with a leading space
    /// has a space as its verb.
    pub fn split(line: &'a str) -> Self {
        let mut argv = [""; MAX_ARGS];
        argv[0] = line;
        for i in 1..MAX_ARGS {
            argv[i] = next_word(argv[i - 1]);
        }

        let argc = argv.iter().take_while(|arg| !arg.is_empty()).count();
        Self { argv, argc }
    }

    /// Number of non-empty arguments, capped at [`MAX_ARGS`]
    pub fn len(&self) -> usize {
        self.argc
    }

    /// Returns true if the line held no arguments at all
    pub fn is_empty(&self) -> bool {
        self.argc == 0
    }

    /// First byte of argument `index`, if present
    pub fn lead(&self, index: usize) -> Option<u8> {
        self.argv.get(index)?.as_bytes().first().copied()
    }

    /// Argument `index` through the end of the line
    pub fn rest(&self, index: usize) -> &'a str {
        self.argv.get(index).copied().unwrap_or("")
    }
}

fn next_word(s: &str) -> &str {
    s.trim_start_matches(|c: char| c != ' ')
        .trim_start_matches(' ')
}
