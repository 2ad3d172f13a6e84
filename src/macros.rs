#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Build a [`PropertyMap`](crate::PropertyMap) from `"property" => "value"` pairs.
#[macro_export]
macro_rules! props {
    () => {
        $crate::PropertyMap::new()
    };
    ($($prop:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::PropertyMap::new();
        $( map.insert(::std::string::String::from($prop), ::std::string::String::from($value)); )+
        map
    }};
}
