use serde::Deserialize;

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

/// Slice of `items` shown on the 1-based `page`. Pages past the end, and page 0, are empty.
pub fn paginate<T>(items: &[T], page: u32) -> &[T] {
    let Some(index) = (page as usize).checked_sub(1) else {
        return &[];
    };
    let start = index.saturating_mul(QUESTIONS_PER_PAGE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}
