use memchr::Memchr2;

/// Tokenizes the `mappings` string of a source map.
///
/// Yields `(segment, closes_line)` pairs: `,` separates segments on the same
/// generated line, `;` closes the current generated line. Segments may be
/// empty (consecutive separators), which callers treat as lines without
/// entries.
#[derive(Debug)]
pub(crate) struct MappingSplitter<'a> {
    string: &'a str,
    cur_start: usize,
    memchr: Memchr2<'a>,
}

impl<'a> MappingSplitter<'a> {
    pub fn new(string: &'a str) -> Self {
        Self {
            string,
            memchr: memchr::memchr2_iter(b';', b',', string.as_bytes()),
            cur_start: 0,
        }
    }
}

impl<'a> Iterator for MappingSplitter<'a> {
    // (segment, closes_line)
    type Item = (&'a str, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let (cur_end, closes_line) = match self.memchr.next() {
            None => {
                if self.cur_start > self.string.len() {
                    return None;
                }
                (self.string.len(), false)
            }
            Some(end) => (end, self.string.as_bytes()[end] == b';'),
        };
        let s = &self.string[self.cur_start..cur_end];
        self.cur_start = cur_end + 1;
        Some((s, closes_line))
    }
}
