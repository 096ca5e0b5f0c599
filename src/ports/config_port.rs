//! Configuration access port.
//!
//! Typed getters return `None` when the key is absent and `Some(Err)` with
//! a description of the offending value when it does not parse.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Option<Result<i64, String>>;
    fn get_double(&self, section: &str, key: &str) -> Option<Result<f64, String>>;
    fn get_bool(&self, section: &str, key: &str) -> Option<Result<bool, String>>;

    /// Comma-separated numbers; the error carries the first bad item.
    fn get_double_list(&self, section: &str, key: &str) -> Option<Result<Vec<f64>, String>> {
        let raw = self.get_string(section, key)?;
        Some(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<f64>().map_err(|_| s.to_string()))
                .collect(),
        )
    }
}
