// src/specs/chart.rs

use std::collections::HashSet;

use chrono::NaiveDate;
use scraper::Html;

use crate::config::consts::{ARTIST_PREFIX, CHART_TABLE_MARKER};
use crate::core::html::{cell_text, find_marked_table, split_on_first_break, table_cells};
use crate::core::sanitize::{parse_count, parse_rank, strip_prefix_ci};
use crate::data::{ChartRow, Region};
use crate::error::{ChartError, Result};

/// Rows pulled from one page plus an account of the rows that needed help.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Rank-ordered, ranks unique.
    pub rows: Vec<ChartRow>,
    /// Kept under the fallback policy: whole combined cell as track, empty artist.
    pub malformed: usize,
    /// Data rows dropped: no rank, no streams, too few cells, or a repeated rank.
    pub skipped: usize,
}

/// Extract the chart for `day`. A page without a `chart-table` marker is
/// `ChartError::MissingTable`, which callers treat as an empty day.
pub fn extract(html_doc: &str, region: &Region, day: NaiveDate) -> Result<Extraction> {
    parse_doc(html_doc, day).ok_or_else(|| ChartError::MissingTable { region: region.clone(), day })
}

/// Split out for unit tests. `None` when the page has no chart table.
///
/// Expected columns, in order: rank, "track<br>by artist", streams. Extra
/// columns between rank and streams (artwork, trend arrows) are tolerated; the
/// combined cell is the first one in that span containing a line break.
pub fn parse_doc(html_doc: &str, day: NaiveDate) -> Option<Extraction> {
    let doc = Html::parse_document(html_doc);
    let table = find_marked_table(&doc, CHART_TABLE_MARKER)?;

    let mut out = Extraction::default();
    let mut seen_ranks: HashSet<u32> = HashSet::new();

    for cells in table_cells(table) {
        if cells.is_empty() {
            continue; // header row (<th> only)
        }

        let texts: Vec<String> = cells.iter().map(|c| cell_text(*c)).collect();
        let Some(rank_ix) = texts.iter().position(|t| parse_rank(t).is_some()) else {
            logd!("{day}: row without rank skipped: {texts:?}");
            out.skipped += 1;
            continue;
        };
        let last = cells.len() - 1;
        if last < rank_ix + 2 {
            logd!("{day}: row with too few cells skipped: {texts:?}");
            out.skipped += 1;
            continue;
        }
        let rank = parse_rank(&texts[rank_ix]).unwrap_or_default();
        let Some(streams) = parse_count(&texts[last]) else {
            logd!("{day}: rank {rank} has no stream count: {:?}", texts[last]);
            out.skipped += 1;
            continue;
        };
        if !seen_ranks.insert(rank) {
            logw!("{day}: duplicate rank {rank} skipped");
            out.skipped += 1;
            continue;
        }

        let split = cells[rank_ix + 1..last]
            .iter()
            .map(|c| split_on_first_break(*c))
            .find(|(_, tail)| tail.is_some())
            .unwrap_or_else(|| split_on_first_break(cells[rank_ix + 1]));

        let (track, artist) = match split {
            (track, Some(tail)) => (track, s!(strip_prefix_ci(&tail, ARTIST_PREFIX))),
            (track, None) => {
                logw!("{}", ChartError::MalformedRow { day, rank, cell: track.clone() });
                out.malformed += 1;
                (track, s!())
            }
        };

        out.rows.push(ChartRow { rank, track, artist, streams, day });
    }

    out.rows.sort_by_key(|r| r.rank);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
    }

    fn page(body_rows: &str) -> String {
        format!(
            r#"<html><body>
                <table class="chart-table">
                  <thead><tr><th>#</th><th>Track</th><th>Streams</th></tr></thead>
                  <tbody>{body_rows}</tbody>
                </table>
            </body></html>"#
        )
    }

    #[test]
    fn strips_by_prefix_from_artist() {
        let doc = page(r#"<tr><td>1</td><td>I'm the One<br>by DJ Khaled</td><td>1,234,567</td></tr>"#);
        let out = parse_doc(&doc, day()).unwrap();
        assert_eq!(out.rows.len(), 1);
        let row = &out.rows[0];
        assert_eq!(row.rank, 1);
        assert_eq!(row.track, "I'm the One");
        assert_eq!(row.artist, "DJ Khaled");
        assert_eq!(row.streams, 1_234_567);
        assert_eq!(row.day, day());
        assert_eq!(out.malformed, 0);
    }

    #[test]
    fn splits_on_first_break_only() {
        let doc = page("<tr><td>1</td><td>A<br>by B<br>C</td><td>10</td></tr>");
        let out = parse_doc(&doc, day()).unwrap();
        assert_eq!(out.rows[0].track, "A");
        assert_eq!(out.rows[0].artist, "BC");
    }

    #[test]
    fn missing_separator_keeps_row_with_empty_artist() {
        let doc = page(
            "<tr><td>1</td><td>Fine<br>by Ok</td><td>10</td></tr>\
             <tr><td>2</td><td>No Separator Here</td><td>9</td></tr>",
        );
        let out = parse_doc(&doc, day()).unwrap();
        assert_eq!(out.rows.len(), 2);
        assert_eq!(out.malformed, 1);
        assert_eq!(out.rows[1].track, "No Separator Here");
        assert_eq!(out.rows[1].artist, "");
    }

    #[test]
    fn page_without_marker_is_missing() {
        let doc = "<html><body><table><tr><td>1</td><td>x<br>by y</td><td>3</td></tr></table></body></html>";
        assert!(parse_doc(doc, day()).is_none());
        let err = extract(doc, &Region::new("us"), day()).unwrap_err();
        assert!(matches!(err, ChartError::MissingTable { .. }));
        assert!(err.is_day_gap());
    }

    #[test]
    fn extra_columns_between_rank_and_streams() {
        let doc = r#"<div class="chart-table"><table><tbody>
            <tr><td class="pos">2</td><td class="trend"></td><td><img src="a.png"></td>
                <td><strong>Havana</strong><br>by Camila Cabello</td><td>2,000</td></tr>
            <tr><td>1</td><td></td><td></td><td><strong>God's Plan</strong><br>by Drake</td><td>3,000</td></tr>
        </tbody></table></div>"#;
        let out = parse_doc(doc, day()).unwrap();
        let ranks: Vec<u32> = out.rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
        assert_eq!(out.rows[0].track, "God's Plan");
        assert_eq!(out.rows[1].artist, "Camila Cabello");
    }

    #[test]
    fn unusable_rows_are_counted() {
        let doc = page(
            "<tr><td>1</td><td>A<br>by B</td><td>10</td></tr>\
             <tr><td>1</td><td>Dup<br>by B</td><td>5</td></tr>\
             <tr><td>x</td><td>C<br>by D</td><td>5</td></tr>\
             <tr><td>3</td><td>E<br>by F</td><td>-</td></tr>",
        );
        let out = parse_doc(&doc, day()).unwrap();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.skipped, 3);
    }

    #[test]
    fn empty_table_is_not_missing() {
        let out = parse_doc(&page(""), day()).unwrap();
        assert!(out.rows.is_empty());
    }
}
