//! Model <-> table name conversion

use heck::{ToSnakeCase, ToUpperCamelCase};

/// Converts between model type names and table names.
///
/// Implementations must be deterministic and pure.
pub trait NameConverter {
    fn model_to_table(&self, model_name: &str) -> String;

    fn table_to_model(&self, table_name: &str) -> String;
}

impl<T: NameConverter + ?Sized> NameConverter for &T {
    fn model_to_table(&self, model_name: &str) -> String {
        (**self).model_to_table(model_name)
    }

    fn table_to_model(&self, table_name: &str) -> String {
        (**self).table_to_model(table_name)
    }
}

impl<T: NameConverter + ?Sized> NameConverter for Box<T> {
    fn model_to_table(&self, model_name: &str) -> String {
        (**self).model_to_table(model_name)
    }

    fn table_to_model(&self, table_name: &str) -> String {
        (**self).table_to_model(table_name)
    }
}

/// Keeps model names as table names and cleans up legacy table names for models.
///
/// `tabUser` / `tbl_user` -> `User`, `order_items` -> `OrderItems`, `Post` -> `Post`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNameConverter;

const LEGACY_PREFIXES: &[&str] = &["tab", "tbl"];

fn strip_legacy_prefix(table_name: &str) -> &str {
    for prefix in LEGACY_PREFIXES {
        let Some(head) = table_name.get(..prefix.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(prefix) {
            continue;
        }
        let rest = &table_name[prefix.len()..];
        match rest.chars().next() {
            Some('_') if rest.len() > 1 => return &rest[1..],
            Some(c) if c.is_uppercase() => return rest,
            _ => {}
        }
    }
    table_name
}

fn has_separators(name: &str) -> bool {
    name.contains(['_', '-', ' ', '.'])
}

impl NameConverter for DefaultNameConverter {
    fn model_to_table(&self, model_name: &str) -> String {
        model_name.to_string()
    }

    fn table_to_model(&self, table_name: &str) -> String {
        let name = strip_legacy_prefix(table_name.trim());
        if has_separators(name) {
            return name.to_upper_camel_case();
        }
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// PascalCase singular model names <-> snake_case plural table names.
///
/// `BlogPost` <-> `blog_posts`
#[derive(Debug, Clone, Copy, Default)]
pub struct PluralNameConverter;

impl PluralNameConverter {
    fn inflect_last_word(snake: &str, count: isize) -> String {
        match snake.rsplit_once('_') {
            Some((head, last)) => {
                format!("{head}_{}", pluralizer::pluralize(last, count, false))
            }
            None => pluralizer::pluralize(snake, count, false),
        }
    }
}

impl NameConverter for PluralNameConverter {
    fn model_to_table(&self, model_name: &str) -> String {
        Self::inflect_last_word(&model_name.to_snake_case(), 2)
    }

    fn table_to_model(&self, table_name: &str) -> String {
        let name = strip_legacy_prefix(table_name.trim());
        Self::inflect_last_word(&name.to_snake_case(), 1).to_upper_camel_case()
    }
}
