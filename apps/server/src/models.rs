//! Response shapes shared by the list endpoints.

use axum::http::Uri;
use serde::{Deserialize, Serialize};

use energycoop_core::pagination::{PageRequest, Paginated};

/// `page` and `per_page` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageQuery {
    pub fn request(&self, cap: i64) -> PageRequest {
        PageRequest::new(self.page, self.per_page, cap)
    }
}

#[derive(Debug, Serialize)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

/// `{data, links, meta}` envelope returned by every paginated listing.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub links: PageLinks,
    pub meta: PageMeta,
}

/// Builds the URL of another page, keeping every other query parameter.
fn page_url(uri: &Uri, page: i64) -> String {
    let mut params: Vec<(String, String)> = uri
        .query()
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();
    params.retain(|(key, _)| key != "page");
    params.push(("page".to_string(), page.to_string()));
    let query = serde_urlencoded::to_string(&params).unwrap_or_default();
    format!("{}?{}", uri.path(), query)
}

impl<T> PaginatedResponse<T> {
    pub fn new(page: Paginated<T>, uri: &Uri) -> Self {
        let last_page = page.last_page();
        let current = page.page;
        let count = page.items.len() as i64;
        let offset = (current - 1).saturating_mul(page.per_page);
        let (from, to) = if count == 0 {
            (None, None)
        } else {
            (Some(offset + 1), Some(offset + count))
        };

        Self {
            links: PageLinks {
                first: page_url(uri, 1),
                last: page_url(uri, last_page),
                prev: (current > 1).then(|| page_url(uri, current - 1)),
                next: (current < last_page).then(|| page_url(uri, current + 1)),
            },
            meta: PageMeta {
                current_page: current,
                per_page: page.per_page,
                total: page.total,
                last_page,
                from,
                to,
            },
            data: page.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_meta_and_links() {
        let uri: Uri = "/api/v1/faqs?category=billing&page=2&per_page=2".parse().unwrap();
        let request = PageQuery {
            page: Some(2),
            per_page: Some(2),
        }
        .request(20);
        let page = Paginated::new(vec!["c", "d"], 5, request);

        let response = PaginatedResponse::new(page, &uri);

        assert_eq!(response.meta.last_page, 3);
        assert_eq!(response.meta.from, Some(3));
        assert_eq!(response.meta.to, Some(4));
        assert_eq!(
            response.links.next.as_deref(),
            Some("/api/v1/faqs?category=billing&per_page=2&page=3")
        );
        assert_eq!(
            response.links.prev.as_deref(),
            Some("/api/v1/faqs?category=billing&per_page=2&page=1")
        );
    }

    #[test]
    fn test_out_of_range_page_renders_an_empty_envelope() {
        let uri: Uri = "/api/v1/banners?page=9223372036854775807".parse().unwrap();
        let request = PageQuery {
            page: Some(i64::MAX),
            per_page: None,
        }
        .request(20);
        let page = Paginated::<i32>::new(vec![], 4, request);
        let response = PaginatedResponse::new(page, &uri);
        assert_eq!(response.meta.from, None);
        assert_eq!(response.meta.last_page, 1);
        assert_eq!(response.links.next, None);
        assert!(response.links.prev.is_some());
    }

    #[test]
    fn test_empty_page_has_no_range() {
        let uri: Uri = "/api/v1/banners".parse().unwrap();
        let page = Paginated::<i32>::new(vec![], 0, PageRequest::default());
        let response = PaginatedResponse::new(page, &uri);
        assert_eq!(response.meta.from, None);
        assert_eq!(response.links.next, None);
        assert_eq!(response.links.last, "/api/v1/banners?page=1");
    }
}
