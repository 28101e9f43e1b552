//! Contains `Store`, the variable storage programs evaluate against.

use crate::{
    error::{ErrorKind, TranslateError},
    trace,
};

use fnv::FnvHashMap;

/// Maps variable names to their current values.
///
/// A store lives for a whole run, so a variable assigned by one program can
/// be read by the next. Variables are remembered in the order they were
/// first assigned, which is the order their C declarations are written in.
#[derive(Debug, Default, Clone)]
pub struct Store {
    table: FnvHashMap<String, usize>,
    values: Vec<(String, f64)>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    /// Sets `name` to `value`, returning `value`.
    pub fn put(&mut self, name: &str, value: f64) -> f64 {
        trace!("put {} = {}", name, value);
        if let Some(index) = self.table.get(name) {
            self.values[*index].1 = value;
        } else {
            self.table.insert(name.to_owned(), self.values.len());
            self.values.push((name.to_owned(), value));
        }
        value
    }

    /// Reads `name`. `pos` is where the program referred to it.
    pub fn get(&self, pos: usize, name: &str) -> Result<f64, TranslateError> {
        self.table
            .get(name)
            .map(|index| self.values[*index].1)
            .ok_or_else(|| {
                TranslateError::new(ErrorKind::UndefinedVariable {
                    name: name.to_owned(),
                })
                .pos(pos)
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Variables and their values, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// A C declaration of every variable, like `double a,b;\n`. Empty if
    /// there are no variables.
    pub fn render_declarations(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let names: Vec<&str> = self.iter().map(|(name, _)| name).collect();
        format!("double {};\n", names.join(","))
    }
}

#[cfg(test)]
mod test {
    use super::Store;
    use crate::error::ErrorKind;

    #[test]
    fn put_get() {
        let mut store = Store::new();
        assert_eq!(store.put("x", 1.0), 1.0);
        assert_eq!(store.get(0, "x").unwrap(), 1.0);
        assert_eq!(store.put("x", -2.5), -2.5);
        assert_eq!(store.get(0, "x").unwrap(), -2.5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn undefined() {
        let store = Store::new();
        let err = store.get(7, "nope").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::UndefinedVariable {
                name: String::from("nope")
            }
        );
        assert_eq!(err.position(), 7);
        assert!(err.to_string().ends_with("undefined variable: nope"));
    }

    #[test]
    fn declarations() {
        let mut store = Store::new();
        assert_eq!(store.render_declarations(), "");

        store.put("zeta", 1.0);
        assert_eq!(store.render_declarations(), "double zeta;\n");

        store.put("alpha", 2.0);
        store.put("mid", 3.0);
        store.put("zeta", 4.0);
        assert_eq!(store.render_declarations(), "double zeta,alpha,mid;\n");
        assert_eq!(
            store.iter().collect::<Vec<_>>(),
            vec![("zeta", 4.0), ("alpha", 2.0), ("mid", 3.0)]
        );
    }
}
