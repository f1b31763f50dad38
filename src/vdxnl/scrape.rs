use scraper::{ElementRef, Html, Selector};

use crate::common::{Record, ResponseSnafu, Result, ScraperSnafu};

/// Translates console HTML into session and record state.
///
/// This is the only place that knows the console markup.
pub trait Markup {
    /// The link the identity host shows after a successful login.
    fn continue_link(&self, html: &str) -> Option<String>;

    /// The domain identifier linked from the account listing.
    fn domain_id(&self, html: &str, domain: &str) -> Option<String>;

    /// Every record row of the DNS management page.
    fn records(&self, html: &str) -> Result<Vec<Record>>;
}

pub struct HtmlScraper {
    continue_link: Selector,
    anchor: Selector,
    dns_table: Selector,
    row: Selector,
    cell: Selector,
    input: Selector,
}

impl HtmlScraper {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // Anchors without an href are not links to follow
            continue_link: selector(r#"a[target="_parent"][href]"#)?,
            anchor: selector("a[href]")?,
            dns_table: selector("#dnsTbl")?,
            row: selector("tr")?,
            cell: selector("td")?,
            input: selector("input")?,
        })
    }

    fn input_attr(&self, cell: Option<&ElementRef>, attr: &str) -> Option<String> {
        cell?
            .select(&self.input)
            .next()?
            .value()
            .attr(attr)
            .map(str::to_string)
    }

    fn parse_row(&self, cells: &[ElementRef]) -> Record {
        let name = self.input_attr(cells.first(), "value").unwrap_or_default();

        // Inputs in the type cell are named like "type_<id>"
        let id = self
            .input_attr(cells.get(1), "name")
            .and_then(|n| n.split('_').nth(1).map(str::to_string))
            .unwrap_or_default();

        let kind = cells
            .get(1)
            .and_then(|cell| cell.text().map(str::trim).find(|t| !t.is_empty()))
            .unwrap_or_default()
            .to_string();

        let content = self.input_attr(cells.get(3), "value").unwrap_or_default();

        Record {
            id,
            name,
            kind,
            content,
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| {
        ScraperSnafu {
            message: format!("invalid selector {css}: {err:?}"),
        }
        .build()
    })
}

impl Markup for HtmlScraper {
    fn continue_link(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.continue_link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string)
    }

    fn domain_id(&self, html: &str, domain: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let href = document
            .select(&self.anchor)
            .filter(|a| a.text().collect::<String>().trim() == domain)
            .last()?
            .value()
            .attr("href")?;

        href.trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    fn records(&self, html: &str) -> Result<Vec<Record>> {
        let document = Html::parse_document(html);
        let table = match document.select(&self.dns_table).next() {
            Some(table) => table,
            None => {
                return ResponseSnafu {
                    message: "DNS table not found on management page",
                }
                .fail()
            }
        };

        Ok(table
            .select(&self.row)
            .filter_map(|row| {
                let cells: Vec<ElementRef> = row.select(&self.cell).collect();
                (!cells.is_empty()).then(|| self.parse_row(&cells))
            })
            .collect())
    }
}
