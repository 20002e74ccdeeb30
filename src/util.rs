#[macro_export]
/// Helper macro to compose `From` implementations.
macro_rules! compose_from {
    ($to:tt, $mid:tt, $from:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> Self { Self::from($mid::from(f)) }
        }
    };
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_as {
    ($to:tt, $from:ty, $as:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $to::from(f as $as) }
        }
    };
}

#[macro_export]
/// Implements `From` for every primitive integer narrower than 64 bits by widening to `i64`.
macro_rules! from_prims {
    ($to:tt) => {
        from_as!($to, i32, i64);
        from_as!($to, i16, i64);
        from_as!($to, i8, i64);

        from_as!($to, u32, i64);
        from_as!($to, u16, i64);
        from_as!($to, u8, i64);
    };
}

#[macro_export]
/// Implements `TryFrom<$from>` for the payload of one of its variants. A value of any other
/// variant is handed back as the error.
macro_rules! try_from_ctor {
    ($from:ident, $to:ty, $ctor:ident) => {
        impl std::convert::TryFrom<$from> for $to {
            type Error = $from;

            fn try_from(f: $from) -> std::result::Result<$to, $from> {
                match f {
                    $from::$ctor(x) => Ok(x),
                    other => Err(other),
                }
            }
        }
    };
}
