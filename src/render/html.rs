use crate::model::{Aggregate, CountShare, OperationStats};
use crate::render::{SUMMARY_IMAGE, palette_color};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HtmlReportData<'a> {
    source: &'a str,
    generated_at: &'a str,
    total: usize,
    zero_time_count: usize,
    summary_image: &'static str,
    ranking: Vec<CountShare>,
    operations: Vec<HtmlOperation<'a>>,
}

#[derive(Debug, Serialize)]
struct HtmlOperation<'a> {
    #[serde(flatten)]
    stats: &'a OperationStats,
    image: String,
    color: String,
}

/// Render `benchmark_report.html`: a statistics table plus the PNG images,
/// with the aggregate embedded as JSON. `image_names` is parallel to
/// `agg.operations` (see `operation_image_names`).
///
/// The page is a plain template with a `__DATA__` placeholder; the JS template
/// literals (`${x}`) rule out `format!()`.
pub fn render_html_report(
    source: &str,
    generated_at: &str,
    agg: &Aggregate,
    image_names: &[String],
) -> anyhow::Result<String> {
    let data = HtmlReportData {
        source,
        generated_at,
        total: agg.total,
        zero_time_count: agg.zero_time_count,
        summary_image: SUMMARY_IMAGE,
        ranking: agg.count_ranking(),
        operations: agg
            .operations
            .iter()
            .zip(image_names)
            .enumerate()
            .map(|(i, (stats, image))| {
                let (r, g, b) = palette_color(i);
                HtmlOperation {
                    stats,
                    image: image.clone(),
                    color: format!("#{:02x}{:02x}{:02x}", r, g, b),
                }
            })
            .collect(),
    };

    // Embedded inside <script>; keep "</script>" in operation names from closing it.
    let json = serde_json::to_string(&data)?.replace("</", "<\\/");

    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Benchmark Analysis</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .main { padding: 12px 16px; }

  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }
  .pill.warn { border-color: #f0c36d; background: #fff8e5; }
  .swatch { display: inline-block; width: 10px; height: 10px; border-radius: 2px; margin-right: 6px; }
  .muted { color: #777; font-size: 12px; }

  table { border-collapse: collapse; width: 100%; margin-top: 8px; }
  th, td { border-bottom: 1px solid #eee; padding: 6px 8px; text-align: left; font-size: 14px; }
  th { position: sticky; top: 0; background: white; border-bottom: 1px solid #ddd; }
  .num { text-align: right; font-variant-numeric: tabular-nums; }
  img { max-width: 100%; border: 1px solid #eee; margin-top: 8px; }
  section { margin-top: 24px; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
  <div class="muted" id="meta"></div>
</header>

<div class="main">
  <table id="statsTable">
    <thead>
      <tr>
        <th>operation</th>
        <th class="num">count</th>
        <th class="num">share</th>
        <th class="num">non-zero</th>
        <th class="num">mean</th>
        <th class="num">median</th>
        <th class="num">std dev</th>
        <th class="num">min</th>
        <th class="num">max</th>
        <th class="num">p95</th>
      </tr>
    </thead>
    <tbody id="statsBody"></tbody>
  </table>

  <section>
    <h3>Summary</h3>
    <div class="muted">distribution · mean time (non-zero) · time progression · cumulative time (s)</div>
    <img id="summaryImage" alt="benchmark summary">
  </section>

  <div id="operations"></div>
</div>

<script>
// Embedded report data (JSON object literal)
const DATA = __DATA__;

function fmtUs(x) {
  return (Math.round(x * 100) / 100).toFixed(2);
}

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function renderSummary() {
  const el = document.getElementById("summary");
  const warn = DATA.zero_time_count > 0
    ? `<span class="pill warn">zero-time records: <b>${DATA.zero_time_count}</b></span>`
    : "";
  el.innerHTML = `
    <span class="pill">operations: <b>${DATA.total}</b></span>
    <span class="pill">distinct: <b>${DATA.operations.length}</b></span>
    ${warn}
  `;
  document.getElementById("meta").textContent =
    `data file: ${DATA.source} | generated: ${DATA.generated_at}`;
}

function renderTable() {
  const body = document.getElementById("statsBody");
  const share = new Map(DATA.ranking.map((r) => [r.operation, r.share]));
  body.innerHTML = "";
  for (const op of DATA.operations) {
    const s = op.summary;
    const cell = (v) => `<td class="num">${s ? fmtUs(v) : "-"}</td>`;
    const tr = document.createElement("tr");
    tr.innerHTML = `
      <td><span class="swatch" style="background:${op.color}"></span>${escapeHtml(op.operation)}</td>
      <td class="num">${op.count}</td>
      <td class="num">${share.get(op.operation).toFixed(1)}%</td>
      <td class="num">${op.nonzero_count}</td>
      ${cell(s && s.mean)}
      ${cell(s && s.median)}
      ${cell(s && s.stddev)}
      ${cell(s && s.min)}
      ${cell(s && s.max)}
      ${cell(s && s.p95)}
    `;
    body.appendChild(tr);
  }
}

function renderImages() {
  document.getElementById("summaryImage").src = DATA.summary_image;
  const root = document.getElementById("operations");
  for (const op of DATA.operations) {
    const section = document.createElement("section");
    section.innerHTML = `
      <h3><span class="swatch" style="background:${op.color}"></span>${escapeHtml(op.operation)}</h3>
      <div class="muted">time distribution · time progression</div>
      <img alt="${escapeHtml(op.operation)} analysis">
    `;
    section.querySelector("img").src = op.image;
    root.appendChild(section);
  }
}

renderSummary();
renderTable();
renderImages();
</script>
</body>
</html>
"#;

    Ok(TEMPLATE.replace("__DATA__", &json))
}
