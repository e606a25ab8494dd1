//! ESPN fantasy baseball projections adapter. Pages through each position group's
//! leaderboard and parses one [PlayerRecord] per `table.tableBody`.
//!
//! Stat cells are assigned by position only: cell i of the stats row is the group's
//! stat field i. Any structural surprise (missing row, wrong cell count, non-numeric
//! text) aborts the whole fetch.

use crate::config::RunContext;
use crate::model::{PlayerRecord, Position, PositionEligibility, PositionGroup};
use crate::scraper::{PageSource, ScraperError};
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

const ESPN_PROJECTIONS_URL: &str = "http://games.espn.com/flb/tools/projections";

/// Players per leaderboard page.
pub const PAGE_SIZE: u32 = 15;

/// Leading tokens of the name cell text that are not positions (name, team, status).
const SKIPPED_NAME_TOKENS: usize = 3;

/// Parse a CSS selector or return a parse error (avoids panics from Selector::parse).
fn parse_selector(sel: &str) -> Result<Selector, ScraperError> {
    Selector::parse(sel).map_err(|e| ScraperError::Selector {
        selector: sel.to_string(),
        reason: e.to_string(),
    })
}

fn missing(what: &str) -> ScraperError {
    ScraperError::MissingElement {
        what: what.to_string(),
    }
}

/// Leaderboard page URL for one group and start offset, in the alternate display
/// (one table per player).
pub fn page_url(group: PositionGroup, start_index: u32) -> Result<String, ScraperError> {
    let slot = group.slot_category().to_string();
    let start = start_index.to_string();
    let url = Url::parse_with_params(
        ESPN_PROJECTIONS_URL,
        [
            ("display", "alt"),
            ("slotCategoryGroup", slot.as_str()),
            ("startIndex", start.as_str()),
        ],
    )
    .map_err(|e| ScraperError::InvalidUrl {
        input: ESPN_PROJECTIONS_URL.to_string(),
        reason: e.to_string(),
    })?;
    Ok(url.to_string())
}

/// Start offsets for a group: 0, 15, 30, ... strictly below the group's total.
pub fn start_indices(group: PositionGroup) -> impl Iterator<Item = u32> {
    (0..group.total_items()).step_by(PAGE_SIZE as usize)
}

/// Positions named in the name cell text.
///
/// The first three whitespace-separated tokens are dropped unconditionally. For a
/// two-word name that is "First", "Last," and the team; longer names or a missing
/// team shift real positions into or out of the dropped range.
pub fn parse_eligibility(text: &str) -> PositionEligibility {
    text.replace('\u{a0}', " ")
        .split_whitespace()
        .skip(SKIPPED_NAME_TOKENS)
        .filter_map(|token| Position::from_abbreviation(token.trim_end_matches(',')))
        .collect()
}

/// Parse one stat cell. "--" means no projection and reads as zero.
pub fn parse_stat(text: &str) -> Option<f64> {
    text.replace("--", "0").trim().parse().ok()
}

/// Parse one player's `table.tableBody`: name row first, stats in the third row.
pub fn parse_player(
    table: ElementRef<'_>,
    group: PositionGroup,
) -> Result<PlayerRecord, ScraperError> {
    let row_sel = parse_selector("tr")?;
    let link_sel = parse_selector("td > span.subheadPlayerNameLink > nobr > a")?;
    let name_cell_sel = parse_selector("td > span.subheadPlayerNameLink")?;
    let stat_sel = parse_selector("td.playertableStat")?;

    let rows: Vec<ElementRef<'_>> = table.select(&row_sel).collect();
    let name_row = rows.first().ok_or_else(|| missing("name row"))?;
    let stats_row = rows.get(2).ok_or_else(|| missing("stats row (third row)"))?;

    let link = name_row
        .select(&link_sel)
        .next()
        .ok_or_else(|| missing("player name link"))?;
    let player_id = link
        .value()
        .attr("playerid")
        .ok_or_else(|| missing("playerid attribute on player name link"))?;
    let name = link.text().collect::<String>().trim().to_string();

    let name_cell = name_row
        .select(&name_cell_sel)
        .next()
        .ok_or_else(|| missing("player name cell"))?;
    let eligibility = parse_eligibility(&name_cell.text().collect::<String>());

    let cells: Vec<String> = stats_row
        .select(&stat_sel)
        .map(|c| c.text().collect())
        .collect();
    let fields = group.stat_fields();
    if cells.len() != fields.len() {
        return Err(ScraperError::StatCountMismatch {
            player_id: player_id.to_string(),
            expected: fields.len(),
            found: cells.len(),
        });
    }

    let mut record = PlayerRecord::new(player_id, name);
    record.position_eligibility = eligibility;
    for (field, text) in fields.iter().zip(&cells) {
        let value = parse_stat(text).ok_or_else(|| ScraperError::InvalidStat {
            player_id: player_id.to_string(),
            stat: field.column(),
            text: text.clone(),
        })?;
        record.set_stat(*field, value);
    }

    debug!(?record, "Processing player");
    Ok(record)
}

/// Parse every player table on a leaderboard page, in document order.
pub fn parse_page(html: &str, group: PositionGroup) -> Result<Vec<PlayerRecord>, ScraperError> {
    let doc = Html::parse_document(html);
    let table_sel = parse_selector("table.tableBody")?;
    doc.select(&table_sel)
        .map(|table| parse_player(table, group))
        .collect()
}

/// ESPN projections scraper. Holds a reference to the page source.
pub struct EspnScraper<'a, S: PageSource + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: PageSource + ?Sized> EspnScraper<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        Self { source }
    }

    /// Fetch and parse every page of one group.
    pub fn fetch_group(
        &mut self,
        group: PositionGroup,
    ) -> Result<Vec<PlayerRecord>, ScraperError> {
        let mut players = Vec::new();
        for start_index in start_indices(group) {
            let url = page_url(group, start_index)?;
            info!("Fetching url {}", url);
            let html = self.source.fetch_page(&url)?;
            let page = parse_page(&html, group)?;
            debug!(players = page.len(), start_index, "Parsed page");
            players.extend(page);
        }
        Ok(players)
    }

    /// Fetch both groups, batters first. The season only labels the run.
    pub fn fetch_projections(
        &mut self,
        ctx: &RunContext,
        season: i32,
    ) -> Result<Vec<PlayerRecord>, ScraperError> {
        let _entered = ctx.span.enter();
        info!("Fetching ESPN projections for {} season", season);
        let mut players = Vec::new();
        for group in PositionGroup::ALL {
            players.extend(self.fetch_group(group)?);
        }
        Ok(players)
    }
}
