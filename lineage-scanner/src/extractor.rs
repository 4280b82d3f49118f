use crate::error::{Result, ScanError};
use crate::record::{Identifier, PersonFields, RelationKind, RelationRef, Vital};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Turns raw page content into the fixed field set of one record.
pub trait RecordExtractor: Send + Sync {
    fn extract(&self, id: &Identifier, raw: &str) -> Result<PersonFields>;
}

/// Extractor for the Find a Grave memorial page layout.
///
/// The memorial name heading is the one element that must be present; a page
/// without it is treated as an unrecognized layout. Everything else is
/// optional and comes back as `None` or an empty list when missing.
pub struct MemorialPageExtractor {
    name: Selector,
    events: Selector,
    birth_date: Selector,
    birth_place: Selector,
    death_date: Selector,
    death_place: Selector,
    family_section: Selector,
    family_label: Selector,
    member: Selector,
    member_name: Selector,
    member_link: Selector,
}

impl MemorialPageExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            name: selector("#content .section-bio-cover h1")?,
            events: selector("dl.mem-events")?,
            birth_date: selector("[itemprop='birthDate']")?,
            birth_place: selector("[itemprop='birthPlace']")?,
            death_date: selector("[itemprop='deathDate']")?,
            death_place: selector("[itemprop='deathPlace']")?,
            family_section: selector("div.col-12.col-sm-6.col-print-auto")?,
            family_label: selector("b")?,
            member: selector("div.member-item")?,
            member_name: selector("h3")?,
            member_link: selector("a[href]")?,
        })
    }

    fn vital(&self, events: ElementRef<'_>, date: &Selector, place: &Selector) -> Option<Vital> {
        let date = events.select(date).next().and_then(non_empty_text);
        let place = events.select(place).next().and_then(non_empty_text);
        Vital::from_parts(date, place)
    }

    fn relations(&self, id: &Identifier, document: &Html) -> Vec<RelationRef> {
        let mut relations = Vec::new();

        for section in document.select(&self.family_section) {
            let label = section.select(&self.family_label).next().and_then(non_empty_text);
            let kind = label
                .as_deref()
                .map(RelationKind::from_label)
                .unwrap_or(RelationKind::Unknown);

            for member in section.select(&self.member) {
                let href = member
                    .value()
                    .attr("data-href")
                    .or_else(|| {
                        member
                            .select(&self.member_link)
                            .next()
                            .and_then(|link| link.value().attr("href"))
                    });

                let Some(relative_id) = href.and_then(Identifier::from_memorial_path) else {
                    debug!(
                        "Record {}: skipping {} entry without a memorial link",
                        id,
                        label.as_deref().unwrap_or("unlabeled")
                    );
                    continue;
                };

                let mut relation = RelationRef::new(relative_id, kind);
                if let Some(name) = member.select(&self.member_name).next().and_then(non_empty_text) {
                    relation = relation.with_name(name);
                }
                if let Some(ref label) = label {
                    relation = relation.with_label(label.clone());
                }
                relations.push(relation);
            }
        }

        relations
    }
}

impl RecordExtractor for MemorialPageExtractor {
    fn extract(&self, id: &Identifier, raw: &str) -> Result<PersonFields> {
        let document = Html::parse_document(raw);

        let heading = document.select(&self.name).next().ok_or_else(|| {
            ScanError::ExtractionError(format!(
                "record {}: memorial name heading not found, page layout not recognized",
                id
            ))
        })?;
        let name = clean_name(&heading.text().collect::<String>());

        let (birth, death) = match document.select(&self.events).next() {
            Some(events) => (
                self.vital(events, &self.birth_date, &self.birth_place),
                self.vital(events, &self.death_date, &self.death_place),
            ),
            None => {
                debug!("Record {}: no birth/death events block", id);
                (None, None)
            }
        };

        let relations = self.relations(id, &document);
        debug!(
            "Record {}: extracted {} relation reference(s)",
            id,
            relations.len()
        );

        Ok(PersonFields {
            name: (!name.is_empty()).then_some(name),
            birth,
            death,
            relations,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScanError::ExtractionError(format!("invalid selector {}: {:?}", css, e)))
}

fn non_empty_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = collapse_whitespace(&text);
    (!text.is_empty()).then_some(text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The veteran badge renders its icon letter next to the word, which shows up
/// as "VVeteran" in the heading text.
fn clean_name(raw: &str) -> String {
    collapse_whitespace(raw).replace("VVeteran", "Veteran")
}
