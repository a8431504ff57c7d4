// benches/extract.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use chart_scrape::{analysis, data::{Dataset, Region}, specs::chart};
use chrono::NaiveDate;

fn synthetic_page(rows: u32) -> String {
    let body: String = (1..=rows)
        .map(|r| {
            format!(
                r#"<tr><td class="chart-table-image"><img src="x.png"></td><td class="chart-table-position">{r}</td>
                   <td class="chart-table-trend"></td>
                   <td class="chart-table-track"><strong>Song number {r}</strong><span><br>by Artist {}</span></td>
                   <td class="chart-table-streams">{},{:03}</td></tr>"#,
                r % 37,
                1_000 - r,
                r * 7 % 1000
            )
        })
        .collect();
    format!(
        r#"<html><head><title>Charts</title></head><body><nav><a href="/">home</a></nav>
           <div class="chart-table"><table><thead><tr><th></th><th></th><th></th><th>Track</th><th>Streams</th></tr></thead>
           <tbody>{body}</tbody></table></div></body></html>"#
    )
}

fn bench_extract(c: &mut Criterion) {
    let doc = synthetic_page(200);
    let day = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();

    c.bench_function("chart_parse_doc_200", |b| {
        b.iter(|| {
            let ex = chart::parse_doc(black_box(&doc), day).unwrap();
            black_box(ex.rows.len())
        })
    });

    let mut ds = Dataset::new(Region::new("us"));
    for d in day.iter_days().take(150) {
        ds.rows.extend(chart::parse_doc(&doc, d).unwrap().rows);
    }
    c.bench_function("track_summaries_150_days", |b| {
        b.iter(|| black_box(analysis::track_summaries(black_box(&ds)).len()))
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
