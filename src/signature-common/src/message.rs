//! Terminal messages for the command line. Every macro expects `Colorize` to be in scope.

#[macro_export]
macro_rules! success_message {
    ($($arg:tt)*) => {
        println!("{} {}", "[SUCCESS]".green().bold(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! error_message {
    ($($arg:tt)*) => {
        eprintln!("{} {}", "  [ERROR]".red().bold(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! warning_message {
    ($($arg:tt)*) => {
        println!("{} {}", "[WARNING]".yellow().bold(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! info_message {
    ($($arg:tt)*) => {
        println!("{} {}", "   [INFO]".cyan().bold(), format!($($arg)*));
    };
}

/// One report line: a green check or a red cross followed by the text.
#[macro_export]
macro_rules! verdict_line {
    ($passed:expr, $($arg:tt)*) => {
        if $passed {
            println!("{} {}", "✓".green().bold(), format!($($arg)*));
        } else {
            println!("{} {}", "✗".red().bold(), format!($($arg)*));
        }
    };
}
