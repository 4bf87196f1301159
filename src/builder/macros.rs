//! Macros for ergonomic declarations and record values.

/// Declare an ordered list of variants and start a [`KindBuilder`](crate::builder::KindBuilder).
///
/// Each argument may be anything convertible into a
/// [`Variant`](crate::core::Variant): string, integer or boolean constants,
/// or wrapper [`Kind`](crate::core::Kind)s.
///
/// # Example
///
/// ```
/// use variantstate::core::Kind;
/// use variantstate::declare;
///
/// let ok = Kind::new("Ok");
/// let err = Kind::new("Err");
///
/// let result = declare!("pending", &ok, &err)
///     .transition("pending", [&ok, &err])
///     .build()
///     .unwrap();
///
/// let state = result.init("pending").unwrap();
/// assert!(state.allowed(ok.wrap(200)));
/// ```
#[macro_export]
macro_rules! declare {
    ($($variant:expr),+ $(,)?) => {
        $crate::builder::KindBuilder::new(::std::vec![
            $($crate::core::Variant::from($variant)),+
        ])
    };
}

/// Build a record [`Value`](crate::core::Value) from `field => value` pairs.
///
/// # Example
///
/// ```
/// use variantstate::record;
/// use variantstate::core::Value;
///
/// let session = record! { "token" => "DEADBEEF", "visits" => 3 };
///
/// assert_eq!(session.field("visits"), Some(&Value::from(3)));
/// ```
#[macro_export]
macro_rules! record {
    ($($field:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut fields = ::std::collections::BTreeMap::<::std::string::String, $crate::core::Value>::new();
        $(
            fields.insert(::std::string::String::from($field), $crate::core::Value::from($value));
        )*
        $crate::core::Value::Record(fields)
    }};
}
