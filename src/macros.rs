//===========================================================================//

macro_rules! invalid_data {
    ($e:expr) => {
        return Err($crate::error::Error::Format(::std::string::String::from($e)))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::Error::Format(format!($fmt, $($arg)+)))
    };
}

macro_rules! invalid_input {
    ($e:expr) => {
        return Err($crate::error::Error::InvalidInput(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::Error::InvalidInput(format!($fmt, $($arg)+)))
    };
}

//===========================================================================//
