use crate::extractor::record::{ListingRecord, NO_FACTION, UNKNOWN};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// Outcome of one extraction pass: the records that parsed, in row order,
/// and a diagnostic line for every row that was dropped.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<ListingRecord>,
    pub skipped: Vec<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Error)]
enum RowError {
    #[error("row contains no cells")]
    NoCells,
}

/// Parses the `#data-table` body of a marketplace snapshot into listing
/// records. A malformed row is logged and skipped; it never aborts the pass.
pub struct ListingExtractor {
    rows: Selector,
    cell: Selector,
    icon_image: Selector,
    name_cell: Selector,
    numeric: Selector,
    link: Selector,
    centered_cell: Selector,
    faction_emblem: Selector,
    cost_values: Selector,
    shop_button: Selector,
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingExtractor {
    pub fn new() -> Self {
        let parse = |s: &str| Selector::parse(s).expect("literal selector");

        Self {
            rows: parse("#data-table tbody tr"),
            cell: parse("td"),
            icon_image: parse(".iconAndQuantity img"),
            name_cell: parse(".name"),
            numeric: parse(".numeric"),
            link: parse("a"),
            centered_cell: parse(r#"td[align="center"]"#),
            faction_emblem: parse(".factionEmblem"),
            cost_values: parse(".costValues"),
            shop_button: parse(".wm-ui-btn-shop-search"),
        }
    }

    pub fn extract(&self, html: &str) -> Extraction {
        let document = Html::parse_document(html);
        let mut extraction = Extraction::default();

        for (index, row) in document.select(&self.rows).enumerate() {
            match self.extract_row(row) {
                Ok(record) => extraction.records.push(record),
                Err(err) => extraction
                    .skipped
                    .push(format!("Error processing row {}: {}", index + 1, err)),
            }
        }

        extraction
    }

    fn extract_row(&self, row: ElementRef) -> Result<ListingRecord, RowError> {
        if row.select(&self.cell).next().is_none() {
            return Err(RowError::NoCells);
        }

        let image_url = row
            .select(&self.icon_image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);

        let (name, quantity) = self.extract_name_and_quantity(row);

        // Positional heuristic: the first two center-aligned cells are
        // duration and seller. Brittle to row-shape changes, preserved
        // because the snapshot format is the contract.
        let centered: Vec<ElementRef> = row.select(&self.centered_cell).collect();
        let duration = centered
            .first()
            .map(|cell| trimmed_text(*cell))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let seller = centered
            .get(1)
            .map(|cell| trimmed_text(*cell))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let faction = row
            .select(&self.faction_emblem)
            .next()
            .map(|cell| trimmed_text(cell))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_FACTION.to_string());

        // The numeric cost text goes into the price untrimmed, as the
        // snapshot renders it.
        let price = row
            .select(&self.cost_values)
            .next()
            .and_then(|cost| cost.select(&self.numeric).next())
            .map(|numeric| format!("{} coins", numeric.text().collect::<String>()))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let shop_button = row.select(&self.shop_button).next();
        let data_attr = |name: &str| {
            shop_button
                .and_then(|button| button.value().attr(name))
                .map(str::to_string)
        };

        Ok(ListingRecord {
            image_url,
            name,
            quantity,
            duration,
            seller,
            faction,
            price,
            data_entry: data_attr("data-entry"),
            data_id: data_attr("data-id"),
            data_name: data_attr("data-name"),
            data_type: data_attr("data-type"),
        })
    }

    /// The name cell mixes the item name with a numeric quantity badge.
    /// Quantity comes from the `.numeric` sub-element; the name is the cell
    /// text with the quantity substring removed. When that leaves nothing,
    /// fall back to the link text, stripped the same way.
    fn extract_name_and_quantity(&self, row: ElementRef) -> (String, String) {
        let mut name = UNKNOWN.to_string();
        let mut quantity = UNKNOWN.to_string();

        let Some(cell) = row.select(&self.name_cell).next() else {
            return (name, quantity);
        };

        let full_text = trimmed_text(cell);

        if let Some(badge) = cell.select(&self.numeric).next() {
            quantity = trimmed_text(badge);

            let remainder = full_text.replace(&quantity, "");
            let remainder = remainder.trim();
            if !remainder.is_empty() {
                name = remainder.to_string();
            }
        }

        if name == UNKNOWN {
            if let Some(link) = cell.select(&self.link).next() {
                let link_text = trimmed_text(link);
                if !link_text.is_empty() && link_text != quantity {
                    let remainder = link_text.replace(&quantity, "");
                    let remainder = remainder.trim();
                    if !remainder.is_empty() {
                        name = remainder.to_string();
                    }
                }
            }
        }

        (name, quantity)
    }
}

fn trimmed_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
