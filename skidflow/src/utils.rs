//! Utilities.

/// Joins the present elements with `sep`. Returns `None` if every element is `None`.
pub fn join_options<I>(sep: &str, iterable: I) -> Option<String>
where I: IntoIterator<Item = Option<String>> {
    let present = iterable.into_iter().flatten().collect::<Vec<_>>();
    if present.is_empty() {
        None
    } else {
        Some(present.join(sep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_skips_missing_names() {
        let names = [Some("m".to_string()), None, Some("tdata".to_string())];
        assert_eq!(join_options("_", names).as_deref(), Some("m_tdata"));
        assert_eq!(join_options("_", [None, None]), None);
    }
}
