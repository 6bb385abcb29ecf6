// benches/fragment.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use finsim_console::dispatch::cache::PageCache;
use finsim_console::dispatch::fragment::Fragment;

/// Home page with a long airport list, like a busy network.
fn home_page(rows: usize) -> String {
    let mut html = String::from(
        r#"<html><body><div id="airport-list-container"><h2>Airports</h2>
        <button id="add-airport-btn">Add Airport</button><table>
        <tr><th></th><th>Name</th><th>City</th><th>Country</th><th>IATA</th></tr>"#,
    );
    for i in 0..rows {
        html.push_str(&format!(
            "<tr><td><input type=\"checkbox\" value=\"{i}\"></td><td>Airport {i}</td>\
             <td>City {i}</td><td>Country</td><td>A{i:02}</td></tr>"
        ));
    }
    html.push_str("</table></div><div id=\"aircraft-list-container\"><table></table></div>");
    html.push_str("<script>wire()</script></body></html>");
    html
}

fn form_page() -> String {
    let mut html = String::from(r#"<div class="tab-content-inner"><h3>Add Aircraft</h3>"#);
    for i in 0..40 {
        html.push_str(&format!("<label>Field {i}</label><input name=\"f{i}\" value=\"v{i}\">"));
    }
    html.push_str(r#"<select name="type"><option>B737</option><option selected>A320</option></select>"#);
    html.push_str("<script>init()</script></div>");
    html
}

fn bench_fragments(c: &mut Criterion) {
    let home = home_page(500);
    let form = form_page();

    c.bench_function("cache_ingest_home_500", |b| {
        b.iter(|| {
            let cache = PageCache::new();
            black_box(cache.ingest(black_box(&home)))
        })
    });

    c.bench_function("extract_form", |b| {
        b.iter(|| {
            let f = Fragment::extract(black_box(&form), Some("tab-content-inner"));
            black_box(f.blocks.len())
        })
    });
}

criterion_group!(benches, bench_fragments);
criterion_main!(benches);
