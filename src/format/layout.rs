//! Page layout arithmetic

/// Number of `page_size`-byte pages needed to hold `length` bytes.
///
/// `page_size` must be non-zero; callers validate it before use.
pub fn page_count(page_size: u32, length: u32) -> u32 {
    length.div_ceil(page_size)
}

/// Returns true if the global page `page` is one of a Free Page Map pair.
///
/// Every block of `page_size` pages reserves its second and third page for
/// the two FPM copies, so a commit can flip the active copy atomically. One
/// FPM page can track `page_size * 8` pages, which makes this placement 8x
/// more than needed. Existing containers are laid out this way, so the
/// placement must be kept as is.
pub fn is_fpm_page(page: u32, page_size: u32) -> bool {
    matches!(page % page_size, 1 | 2)
}
