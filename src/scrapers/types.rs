/// How a site exposes successive listing pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagination {
    /// Result offset grows by `step`; the page whose body contains
    /// `end_marker` is the last one.
    Offset {
        step: usize,
        end_marker: &'static str,
    },
    /// Page index grows by one; the first page without listing links ends
    /// the crawl.
    Index,
}

impl Pagination {
    pub fn cursor(&self) -> PageCursor {
        let step = match self {
            Pagination::Offset { step, .. } => *step,
            Pagination::Index => 1,
        };
        PageCursor { position: 0, step }
    }

    /// Whether the page just processed is the final one.
    pub fn is_last_page(&self, body: Option<&str>, link_count: usize) -> bool {
        match self {
            Pagination::Offset { end_marker, .. } => {
                body.map_or(false, |body| body.contains(*end_marker))
            }
            Pagination::Index => link_count == 0,
        }
    }
}

/// Position in the listing pages: an offset or a page index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    position: usize,
    step: usize,
}

impl PageCursor {
    pub fn current(&self) -> usize {
        self.position
    }

    pub fn advance(&mut self) {
        self.position += self.step;
    }
}

/// Target table and its column set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableShape {
    pub name: &'static str,
    pub with_country: bool,
}

const BASE_COLUMNS: [&str; 11] = [
    "title",
    "price",
    "address",
    "key_features",
    "description",
    "images",
    "price_per_month",
    "price_per_week",
    "right_image_url",
    "latitude",
    "longitude",
];

impl TableShape {
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = BASE_COLUMNS.to_vec();
        if self.with_country {
            columns.push("country");
        }
        columns
    }

    /// Parameterized INSERT for one row
    pub fn insert_sql(&self) -> String {
        let columns = self.columns();
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            columns.join(", "),
            placeholders
        )
    }
}
