/// Parse a page selection like "1,3-5,8-" into sorted, 0-indexed page numbers.
///
/// Input is 1-indexed. An open end (`8-`) runs to the last page.
pub fn parse_page_range(input: &str, page_count: usize) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();

    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_page(start)?;
                let end = match end.trim() {
                    "" => page_count,
                    end => parse_page(end)?,
                };
                (start, end)
            }
            None => {
                let page = parse_page(part)?;
                (page, page)
            }
        };

        for page in [start, end] {
            if page > page_count {
                return Err(format!(
                    "page {page} exceeds document page count ({page_count})"
                ));
            }
        }
        if start > end {
            return Err(format!("invalid page range '{part}' (start after end)"));
        }
        pages.extend((start - 1)..end);
    }

    if pages.is_empty() {
        return Err(format!("invalid page selection: '{input}'"));
    }
    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

fn parse_page(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("page 0 is invalid (pages start at 1)".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("invalid page number: '{}'", s.trim())),
    }
}
