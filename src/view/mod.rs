//! View models for the list and detail pages, plus their plain-text form

pub mod detail;
pub mod list;

pub use detail::*;
pub use list::*;

use std::fmt;

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if !self.subtitle.is_empty() {
            writeln!(f, "  {}", self.subtitle)?;
        }
        if !self.body.is_empty() {
            writeln!(f, "  {}", self.body)?;
        }
        write!(f, "  Open details: {}", self.link)
    }
}

impl fmt::Display for TabView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} of {})", self.tab, self.body.len(), self.total)?;
        for facet in &self.facets {
            if !facet.selected.is_empty() {
                writeln!(f, "  {}: {}", facet.label, facet.selected.join(", "))?;
            }
        }
        writeln!(f)?;

        match &self.body {
            ListBody::Cards(cards) => {
                for card in cards {
                    writeln!(f, "{}", card)?;
                    writeln!(f)?;
                }
            }
            ListBody::Table(table) => {
                writeln!(f, "{}", table.columns.join("\t"))?;
                for row in &table.rows {
                    writeln!(f, "{}", row.join("\t"))?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(url) = &self.image_url {
            writeln!(f, "Image: {}", url)?;
        }
        if !self.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.description)?;
        }
        writeln!(f, "---")?;
        for field in self.left.iter().chain(&self.right) {
            writeln!(f, "{}: {}", field.label, field.value)?;
        }
        Ok(())
    }
}
