#[macro_export]
macro_rules! logln {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        if $crate::ENABLE_PRINTING.with(|e| *e.borrow()) {
            println!($fmt $(, $($arg)*)?);
        }
    };
}

#[macro_export]
macro_rules! elogln {
    ($fmt:expr $(, $($arg:tt)*)?) => {
        if $crate::ENABLE_PRINTING.with(|e| *e.borrow()) {
            eprintln!($fmt $(, $($arg)*)?);
        }
    };
}
