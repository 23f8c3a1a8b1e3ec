use std::collections::HashMap;

/// Insertion-ordered string interner.
///
/// The first time a string is seen it receives the next sequential id;
/// repeats reuse the id. The `items` vec is the canonical order for the
/// `sources`/`names` arrays of the payload (id = index). A one-slot cache
/// keeps the common case of consecutive mappings sharing a source to a
/// single comparison.
#[derive(Debug, Default)]
pub(crate) struct StringIndex {
    ids: HashMap<String, u32>,
    items: Vec<String>,
    last: Option<(String, u32)>,
}

impl StringIndex {
    pub fn intern(&mut self, value: &str) -> u32 {
        if let Some((cached, id)) = &self.last {
            if cached == value {
                return *id;
            }
        }

        let id = match self.ids.get(value) {
            Some(&id) => id,
            None => {
                let id = self.items.len() as u32;
                self.ids.insert(value.to_owned(), id);
                self.items.push(value.to_owned());
                id
            }
        };
        self.last = Some((value.to_owned(), id));
        id
    }

    pub fn into_items(self) -> Vec<String> {
        self.items
    }

    #[cfg(test)]
    pub fn items(&self) -> &[String] {
        &self.items
    }
}
