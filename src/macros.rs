// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression: literals, consts, vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! join {
    // String-type concatenation shorthand!
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}

/// Endpoint path with an url-encoded query string.
///
/// `query!("/api/scrape-results/", "module_name" => m, "category" => c)`
/// → `/api/scrape-results/?module_name=..&category=..`
#[macro_export]
macro_rules! query {
    ($path:expr $(, $key:expr => $val:expr)+ $(,)?) => {{
        let mut ser = ::url::form_urlencoded::Serializer::new(::std::string::String::new());
        $(
            ser.append_pair($key, ::core::convert::AsRef::<str>::as_ref(&$val));
        )+
        $crate::join!($path, "?", &ser.finish())
    }};
}
