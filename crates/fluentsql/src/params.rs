//! Named parameter storage and `:name` placeholder compilation.
//!
//! Statements rendered by [`Query`](crate::Query) and ad-hoc statements passed
//! to [`Db`](crate::Db) use `:name` placeholders. Drivers take positional
//! parameters, so before execution the SQL is rewritten into the driver's
//! [`PlaceholderStyle`] and the values are laid out in placeholder order.

use crate::error::{DbError, DbResult};
use crate::value::Value;

/// An ordered name → value map with unique keys.
///
/// Used both for filter parameters and for the pending field maps of
/// INSERT/UPDATE. Inserting an existing key replaces its value in place, so
/// rendering order stays the order keys were first seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

/// Field map for INSERT/UPDATE (column name → value).
pub type FieldMap = Params;

impl Params {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Chainable form of [`Params::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy every entry of `other` into `self`; `other` wins on collisions.
    pub fn merge(&mut self, other: &Params) {
        for (k, v) in other.iter() {
            self.insert(k, v.clone());
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Build a [`Params`] map.
///
/// ```ignore
/// let p = fluentsql::params! { "name" => "Ann", "age" => 30 };
/// ```
#[macro_export]
macro_rules! params {
    () => { $crate::Params::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $( params.insert($key, $value); )+
        params
    }};
}

/// Positional placeholder syntax expected by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `$1, $2, ...` (Postgres). Repeated names reuse their index.
    Dollar,
    /// `?` (MySQL, SQLite). Repeated names bind the value again.
    Question,
}

/// SQL rewritten for a driver together with its positional values.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSql {
    pub sql: String,
    pub values: Vec<Value>,
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Rewrite `:name` placeholders into `style`, resolving each name in `params`.
///
/// Names are Unicode letters, digits, `_` and `.`; a trailing `.` is not part
/// of the name. Quoted literals and identifiers, `--` / `/* */` comments and
/// `::` casts are copied through untouched. With [`PlaceholderStyle::Question`]
/// string literals follow MySQL rules, where a backslash escapes the next
/// character. Parameters that the SQL never mentions are ignored; a
/// placeholder without a parameter is a [`DbError::Bind`].
pub fn compile_named(sql: &str, params: &Params, style: PlaceholderStyle) -> DbResult<CompiledSql> {
    let mut out = String::with_capacity(sql.len());
    let mut values = Vec::new();
    let mut dollar_slots: Vec<(String, usize)> = Vec::new();
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                out.push(c);
                let backslash_escapes = style == PlaceholderStyle::Question && c != '`';
                // Doubled quotes are escapes and simply re-enter the literal.
                while let Some(inner) = chars.next() {
                    out.push(inner);
                    if backslash_escapes && inner == '\\' {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    } else if inner == c {
                        break;
                    }
                }
            }
            '-' if chars.peek() == Some(&'-') => {
                out.push(c);
                for inner in chars.by_ref() {
                    out.push(inner);
                    if inner == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                out.push(c);
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    out.push(inner);
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            ':' if chars.peek() == Some(&':') => {
                out.push_str("::");
                chars.next();
            }
            ':' if chars.peek().is_some_and(|n| is_name_start(*n)) => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if !is_name_char(n) {
                        break;
                    }
                    name.push(n);
                    chars.next();
                }
                let trailing_dots = name.len() - name.trim_end_matches('.').len();
                name.truncate(name.len() - trailing_dots);

                let value = params
                    .get(&name)
                    .ok_or_else(|| DbError::Bind(format!("missing parameter ':{name}'")))?;

                match style {
                    PlaceholderStyle::Question => {
                        values.push(value.clone());
                        out.push('?');
                    }
                    PlaceholderStyle::Dollar => {
                        let idx = match dollar_slots.iter().find(|(n, _)| *n == name) {
                            Some((_, idx)) => *idx,
                            None => {
                                values.push(value.clone());
                                dollar_slots.push((name, values.len()));
                                values.len()
                            }
                        };
                        out.push('$');
                        out.push_str(&idx.to_string());
                    }
                }
                out.push_str(&".".repeat(trailing_dots));
            }
            _ => out.push(c),
        }
    }

    Ok(CompiledSql { sql: out, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut p = Params::new();
        p.insert("a", 1).insert("b", 2).insert("a", 3);
        let keys: Vec<_> = p.keys().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(p.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn params_macro() {
        let p = params! { "name" => "Ann", "age" => 30 };
        assert_eq!(p.len(), 2);
        assert_eq!(p.get("name"), Some(&Value::Text("Ann".into())));
        assert!(params!().is_empty());
    }

    #[test]
    fn merge_prefers_other() {
        let mut fields = params! { "status" => "off", "id" => 1 };
        fields.merge(&params! { "id" => 5 });
        assert_eq!(fields.get("id"), Some(&Value::Int(5)));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn compile_dollar_reuses_index() {
        let p = params! { "id" => 5, "name" => "Ann" };
        let c = compile_named(
            "SELECT * FROM users WHERE id = :id OR parent = :id AND name = :name",
            &p,
            PlaceholderStyle::Dollar,
        )
        .unwrap();
        assert_eq!(
            c.sql,
            "SELECT * FROM users WHERE id = $1 OR parent = $1 AND name = $2"
        );
        assert_eq!(c.values, vec![Value::Int(5), Value::Text("Ann".into())]);
    }

    #[test]
    fn compile_question_repeats_values() {
        let p = params! { "id" => 5 };
        let c = compile_named("a = :id OR b = :id", &p, PlaceholderStyle::Question).unwrap();
        assert_eq!(c.sql, "a = ? OR b = ?");
        assert_eq!(c.values, vec![Value::Int(5), Value::Int(5)]);
    }

    #[test]
    fn compile_skips_literals_casts_and_comments() {
        let p = params! { "id" => 1 };
        let sql = "SELECT ':nope', `x:y`, created::date -- :also\nFROM t /* :no */ WHERE id = :id";
        let c = compile_named(sql, &p, PlaceholderStyle::Dollar).unwrap();
        assert_eq!(
            c.sql,
            "SELECT ':nope', `x:y`, created::date -- :also\nFROM t /* :no */ WHERE id = $1"
        );
        assert_eq!(c.values.len(), 1);
    }

    #[test]
    fn compile_accepts_unicode_and_dotted_names() {
        let p = params! { "prénom" => "Ann", "user.id" => 5, "名前" => "x" };
        let c = compile_named(
            "INSERT INTO t (prénom,名前) VALUES (:prénom,:名前) -- :user.id\nWHERE u = :user.id.",
            &p,
            PlaceholderStyle::Question,
        )
        .unwrap();
        assert_eq!(
            c.sql,
            "INSERT INTO t (prénom,名前) VALUES (?,?) -- :user.id\nWHERE u = ?."
        );
        assert_eq!(
            c.values,
            vec![Value::from("Ann"), Value::from("x"), Value::Int(5)]
        );

        let err = compile_named("a = :prénom", &params! { "pr" => 1 }, PlaceholderStyle::Dollar)
            .unwrap_err();
        assert!(matches!(err, DbError::Bind(ref m) if m.contains(":prénom")));
    }

    #[test]
    fn compile_question_honors_backslash_escapes() {
        let p = params! { "id" => 5 };
        let sql = r#"SELECT * FROM t WHERE name = 'O\'Brien' AND note = "a\"b" AND id = :id"#;
        let c = compile_named(sql, &p, PlaceholderStyle::Question).unwrap();
        assert_eq!(
            c.sql,
            r#"SELECT * FROM t WHERE name = 'O\'Brien' AND note = "a\"b" AND id = ?"#
        );
        assert_eq!(c.values, vec![Value::Int(5)]);

        // Postgres strings are standard conforming: the backslash is literal.
        let c = compile_named(r"SELECT 'C:\' || :id", &p, PlaceholderStyle::Dollar).unwrap();
        assert_eq!(c.sql, r"SELECT 'C:\' || $1");
    }

    #[test]
    fn compile_missing_param_errors() {
        let err = compile_named("id = :id", &Params::new(), PlaceholderStyle::Dollar).unwrap_err();
        assert!(matches!(err, DbError::Bind(ref m) if m.contains(":id")));
    }

    #[test]
    fn compile_ignores_unused_params() {
        let p = params! { "unused" => 1 };
        let c = compile_named("SELECT 1", &p, PlaceholderStyle::Question).unwrap();
        assert_eq!(c.sql, "SELECT 1");
        assert!(c.values.is_empty());
    }
}
