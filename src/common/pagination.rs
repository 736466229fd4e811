// src/common/pagination.rs

use std::collections::HashMap;

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;
/// Maior página cujo offset ainda cabe em `i64`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Parâmetros de listagem já normalizados.
///
/// `page` começa em 1; `page_size` fica entre 1 e 100. Valores inválidos ou
/// fora da faixa são ajustados em vez de rejeitados.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: i64,
    pub page_size: i64,
    pub search: Option<String>,
    pub filters: HashMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            filters: HashMap::new(),
        }
    }
}

impl ListQuery {
    /// Monta a partir da query string crua (`?page=2&pageSize=10&search=sapa&status=active`).
    pub fn from_params(mut params: HashMap<String, String>) -> Self {
        let page = params
            .remove("page")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_PAGE);

        let page_size = params
            .remove("pageSize")
            .or_else(|| params.remove("limit"))
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let search = params
            .remove("search")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // O que sobrou são filtros estruturados; vazios não filtram nada.
        params.retain(|_, v| !v.trim().is_empty());

        Self {
            page,
            page_size,
            search,
            filters: params,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn with_filter(mut self, key: &str, value: impl Into<String>) -> Self {
        self.filters.insert(key.to_string(), value.into());
        self
    }
}

/// Padrão `ILIKE` com `%` e `_` do usuário escapados.
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, query: &ListQuery) -> Self {
        Self {
            items,
            total,
            page: query.page,
            page_size: query.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_when_nothing_given() {
        let q = ListQuery::from_params(HashMap::new());
        assert_eq!(q, ListQuery::default());
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn clamps_page_and_size() {
        let q = ListQuery::from_params(params(&[("page", "0"), ("pageSize", "500")]));
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, MAX_PAGE_SIZE);

        let q = ListQuery::from_params(params(&[("page", "-3"), ("pageSize", "0")]));
        assert_eq!(q.page, 1);
        assert_eq!(q.page_size, 1);

        let q = ListQuery::from_params(params(&[("page", "abc")]));
        assert_eq!(q.page, 1);
    }

    #[test]
    fn huge_page_does_not_overflow_offset() {
        let max = i64::MAX.to_string();
        let q = ListQuery::from_params(params(&[("page", max.as_str()), ("pageSize", "100")]));
        assert_eq!(q.page, MAX_PAGE);
        assert!(q.offset() >= 0);
        assert_eq!(q.offset(), (MAX_PAGE - 1) * 100);

        // Construída à mão, sem passar por from_params.
        let q = ListQuery { page: i64::MAX, page_size: MAX_PAGE_SIZE, ..ListQuery::default() };
        assert_eq!(q.offset(), i64::MAX);
    }

    #[test]
    fn offset_follows_page() {
        let q = ListQuery::from_params(params(&[("page", "3"), ("pageSize", "10")]));
        assert_eq!(q.offset(), 20);
    }

    #[test]
    fn leftovers_become_filters() {
        let q = ListQuery::from_params(params(&[
            ("search", "  sapa "),
            ("status", "active"),
            ("destination", ""),
        ]));
        assert_eq!(q.search.as_deref(), Some("sapa"));
        assert_eq!(q.filters.get("status").map(String::as_str), Some("active"));
        assert!(!q.filters.contains_key("destination"));
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("sapa"), "%sapa%");
        assert_eq!(contains_pattern("100%_off"), "%100\\%\\_off%");
    }
}
