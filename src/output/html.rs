//! Self-contained interactive HTML exporter
//!
//! The page needs no network access. Nodes are laid out in Rust, one row per
//! deployment layer, and drawn as inline SVG. A small script adds wheel zoom,
//! drag to pan, search highlighting, fit-to-screen and a details panel fed by
//! the graph data embedded as JSON.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use serde_json::json;

use super::Exporter;
use crate::error::Result;
use crate::models::analysis::AnalysisReport;
use crate::models::dependency_graph::EdgeKind;

const NODE_HEIGHT: i64 = 36;
const MIN_NODE_WIDTH: i64 = 96;
const CHAR_WIDTH: i64 = 8;
const LAYER_GAP: i64 = 110;
const NODE_GAP: i64 = 40;
const MARGIN: i64 = 40;

/// Interactive single-file HTML page
#[derive(Debug, Default)]
pub struct HtmlExporter;

impl HtmlExporter {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    x: i64,
    y: i64,
    width: i64,
}

impl Placement {
    fn center_x(&self) -> i64 {
        self.x + self.width / 2
    }
}

#[derive(Debug)]
struct Layout {
    nodes: BTreeMap<String, Placement>,
    width: i64,
    height: i64,
}

fn node_width(id: &str) -> i64 {
    let chars = id.chars().count() as i64;
    (24 + chars * CHAR_WIDTH).max(MIN_NODE_WIDTH)
}

/// Rows follow the deployment layers; every row is centered on the widest one
fn layout(report: &AnalysisReport) -> Layout {
    let mut rows: Vec<Vec<String>> = report.deployment_layers.clone();
    let placed: BTreeSet<&String> = rows.iter().flatten().collect();
    let missing: Vec<String> = report
        .modules
        .keys()
        .filter(|id| !placed.contains(id))
        .cloned()
        .collect();
    if !missing.is_empty() {
        rows.push(missing);
    }

    let row_width = |row: &Vec<String>| -> i64 {
        let nodes: i64 = row.iter().map(|id| node_width(id)).sum();
        nodes + NODE_GAP * (row.len() as i64 - 1).max(0)
    };
    let widest = rows.iter().map(row_width).max().unwrap_or(0);

    let mut nodes = BTreeMap::new();
    for (layer, row) in rows.iter().enumerate() {
        let mut x = MARGIN + (widest - row_width(row)) / 2;
        let y = MARGIN + layer as i64 * LAYER_GAP;
        for id in row {
            let width = node_width(id);
            nodes.insert(id.clone(), Placement { x, y, width });
            x += width + NODE_GAP;
        }
    }

    let height = if rows.is_empty() {
        MARGIN * 2
    } else {
        MARGIN * 2 + (rows.len() as i64 - 1) * LAYER_GAP + NODE_HEIGHT
    };

    Layout {
        nodes,
        width: widest.max(MIN_NODE_WIDTH) + MARGIN * 2,
        height,
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_svg(report: &AnalysisReport, layout: &Layout) -> String {
    let cycle_edges = report.cycle_edges();
    let cycle_members = report.cycle_members();
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        "<svg id=\"graph\" xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\">",
        layout.width, layout.height
    );
    svg.push_str(
        "<defs>\
<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"8\" markerHeight=\"8\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"#607d8b\"/></marker>\
<marker id=\"arrow-cycle\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"8\" markerHeight=\"8\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"#d32f2f\"/></marker>\
</defs>\n",
    );

    svg.push_str("<g id=\"edges\">\n");
    for edge in &report.edges {
        let (Some(from), Some(to)) = (layout.nodes.get(&edge.from), layout.nodes.get(&edge.to))
        else {
            continue;
        };
        let in_cycle = cycle_edges.contains(&(edge.from.clone(), edge.to.clone()));
        let (x1, y1) = (from.center_x(), from.y + NODE_HEIGHT);
        let (x2, y2) = (to.center_x(), to.y);
        let bend = LAYER_GAP / 2;

        let mut classes = vec!["edge"];
        if edge.kind == EdgeKind::Inferred {
            classes.push("inferred");
        }
        if in_cycle {
            classes.push("cycle");
        }
        let _ = writeln!(
            svg,
            "<path class=\"{}\" data-from=\"{}\" data-to=\"{}\" d=\"M {} {} C {} {}, {} {}, {} {}\" marker-end=\"url(#{})\"/>",
            classes.join(" "),
            escape_html(&edge.from),
            escape_html(&edge.to),
            x1,
            y1,
            x1,
            y1 + bend,
            x2,
            y2 - bend,
            x2,
            y2,
            if in_cycle { "arrow-cycle" } else { "arrow" }
        );
    }
    svg.push_str("</g>\n<g id=\"nodes\">\n");

    for (id, placement) in &layout.nodes {
        let Some(module) = report.modules.get(id) else {
            continue;
        };
        let mut classes = vec!["node"];
        if module.stub {
            classes.push("stub");
        }
        if module.dependencies.is_empty() && module.dependents.is_empty() {
            classes.push("isolated");
        }
        if cycle_members.contains(id.as_str()) {
            classes.push("cycle");
        }
        let _ = writeln!(
            svg,
            "<g class=\"{}\" data-id=\"{}\"><title>{}</title><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"6\"/><text x=\"{}\" y=\"{}\">{}</text></g>",
            classes.join(" "),
            escape_html(id),
            escape_html(id),
            placement.x,
            placement.y,
            placement.width,
            NODE_HEIGHT,
            placement.center_x(),
            placement.y + NODE_HEIGHT / 2 + 5,
            escape_html(id)
        );
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

fn graph_data(report: &AnalysisReport, layout: &Layout) -> Result<String> {
    let modules: serde_json::Map<String, serde_json::Value> = report
        .modules
        .iter()
        .map(|(id, module)| {
            (
                id.clone(),
                json!({
                    "source": module.source,
                    "dependencies": module.dependencies,
                    "dependents": module.dependents,
                    "outputs": module.outputs,
                    "stub": module.stub,
                    "complexity_score": module.complexity_score,
                }),
            )
        })
        .collect();

    let data = json!({
        "bounds": { "width": layout.width, "height": layout.height },
        "modules": modules,
        "cycles": report.circular_dependencies,
    });

    // Keep the payload from closing its own script element
    Ok(serde_json::to_string(&data)?.replace("</", "<\\/"))
}

const STYLE: &str = r#"
body { margin: 0; font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; color: #263238; background: #fafafa; }
header { display: flex; align-items: center; gap: 16px; padding: 10px 16px; background: #fff; border-bottom: 1px solid #e0e0e0; }
header h1 { font-size: 16px; margin: 0; }
header .stats span { margin-right: 12px; font-size: 13px; }
header .stats .bad { color: #d32f2f; font-weight: 600; }
header input { margin-left: auto; padding: 4px 8px; }
main { display: flex; height: calc(100vh - 50px); }
#canvas { flex: 1; overflow: hidden; }
#graph { width: 100%; height: 100%; cursor: grab; user-select: none; }
#graph.dragging { cursor: grabbing; }
aside { width: 300px; overflow: auto; padding: 12px 16px; background: #fff; border-left: 1px solid #e0e0e0; font-size: 13px; }
aside h2 { font-size: 14px; }
aside li { word-break: break-all; }
.edge { fill: none; stroke: #607d8b; stroke-width: 1.5; }
.edge.inferred { stroke-dasharray: 6 4; }
.edge.cycle { stroke: #d32f2f; stroke-width: 3; }
.node rect { fill: #e3f2fd; stroke: #1e88e5; stroke-width: 1.5; }
.node.isolated rect { fill: #f5f5f5; stroke: #9e9e9e; }
.node.stub rect { fill: #fff; stroke: #9e9e9e; stroke-dasharray: 4 3; }
.node.cycle rect { stroke: #d32f2f; stroke-width: 2.5; }
.node text { font-size: 13px; text-anchor: middle; pointer-events: none; }
.node { cursor: pointer; }
.node.match rect { fill: #fff59d; stroke: #f9a825; stroke-width: 3; }
.node.dim { opacity: 0.25; }
"#;

const SCRIPT: &str = r#"
(function () {
  var svg = document.getElementById('graph');
  var data = JSON.parse(document.getElementById('graph-data').textContent);
  var view = { x: 0, y: 0, w: data.bounds.width, h: data.bounds.height };

  function apply() {
    svg.setAttribute('viewBox', view.x + ' ' + view.y + ' ' + view.w + ' ' + view.h);
  }

  function fit() {
    view = { x: 0, y: 0, w: data.bounds.width, h: data.bounds.height };
    apply();
  }

  svg.addEventListener('wheel', function (e) {
    e.preventDefault();
    var r = svg.getBoundingClientRect();
    var mx = view.x + (e.clientX - r.left) / r.width * view.w;
    var my = view.y + (e.clientY - r.top) / r.height * view.h;
    var k = e.deltaY < 0 ? 0.9 : 1.1;
    view.x = mx - (mx - view.x) * k;
    view.y = my - (my - view.y) * k;
    view.w *= k;
    view.h *= k;
    apply();
  }, { passive: false });

  var drag = null;
  svg.addEventListener('mousedown', function (e) {
    drag = { x: e.clientX, y: e.clientY };
    svg.classList.add('dragging');
  });
  window.addEventListener('mousemove', function (e) {
    if (!drag) return;
    var r = svg.getBoundingClientRect();
    view.x -= (e.clientX - drag.x) / r.width * view.w;
    view.y -= (e.clientY - drag.y) / r.height * view.h;
    drag = { x: e.clientX, y: e.clientY };
    apply();
  });
  window.addEventListener('mouseup', function () {
    drag = null;
    svg.classList.remove('dragging');
  });

  document.getElementById('fit').addEventListener('click', fit);

  var nodes = document.querySelectorAll('g.node');
  document.getElementById('search').addEventListener('input', function (e) {
    var q = e.target.value.trim().toLowerCase();
    nodes.forEach(function (n) {
      var hit = q !== '' && n.getAttribute('data-id').toLowerCase().indexOf(q) !== -1;
      n.classList.toggle('match', hit);
      n.classList.toggle('dim', q !== '' && !hit);
    });
  });

  var details = document.getElementById('details');
  function list(title, items) {
    var h = document.createElement('h2');
    h.textContent = title + ' (' + items.length + ')';
    details.appendChild(h);
    var ul = document.createElement('ul');
    items.forEach(function (item) {
      var li = document.createElement('li');
      li.textContent = item;
      ul.appendChild(li);
    });
    details.appendChild(ul);
  }
  nodes.forEach(function (n) {
    n.addEventListener('click', function () {
      var id = n.getAttribute('data-id');
      var m = data.modules[id];
      if (!m) return;
      details.textContent = '';
      var h = document.createElement('h2');
      h.textContent = id + (m.stub ? ' (stub)' : '');
      details.appendChild(h);
      var p = document.createElement('p');
      p.textContent = 'source: ' + (m.source || '-') + ', complexity: ' + m.complexity_score;
      details.appendChild(p);
      list('Depends on', m.dependencies);
      list('Used by', m.dependents);
      list('Outputs', m.outputs);
    });
  });

  fit();
})();
"#;

impl Exporter for HtmlExporter {
    fn export(&self, report: &AnalysisReport) -> Result<String> {
        let layout = layout(report);
        let title = format!("tfdeps: {}", report.scan_root.display());
        let mut page = String::new();

        page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(page, "<title>{}</title>", escape_html(&title));
        let _ = writeln!(page, "<style>{}</style>\n</head>\n<body>", STYLE);

        page.push_str("<header>\n");
        let _ = writeln!(page, "<h1>{}</h1>", escape_html(&title));
        page.push_str("<div class=\"stats\">");
        let _ = write!(
            page,
            "<span>{} modules</span><span>{} dependencies</span>",
            report.total_modules, report.total_dependencies
        );
        let _ = write!(
            page,
            "<span class=\"{}\">{} cycles</span>",
            if report.has_cycles() { "bad" } else { "ok" },
            report.total_cycles
        );
        let _ = write!(page, "<span>{} diagnostics</span>", report.diagnostics.len());
        if let Some(generated_at) = report.generated_at {
            let _ = write!(page, "<span>{}</span>", generated_at.to_rfc3339());
        }
        page.push_str("</div>\n");
        page.push_str("<input id=\"search\" type=\"search\" placeholder=\"Search modules\">\n");
        page.push_str("<button id=\"fit\" type=\"button\">Fit</button>\n</header>\n");

        page.push_str("<main>\n<div id=\"canvas\">\n");
        page.push_str(&render_svg(report, &layout));
        page.push_str("</div>\n<aside>\n<div id=\"details\"><p>Click a module for details.</p></div>\n");

        if report.has_cycles() {
            page.push_str("<h2>Circular dependencies</h2>\n<ol>\n");
            for cycle in &report.circular_dependencies {
                let _ = writeln!(page, "<li>{}</li>", escape_html(&cycle.to_string()));
            }
            page.push_str("</ol>\n");
        }
        page.push_str("</aside>\n</main>\n");

        let _ = writeln!(
            page,
            "<script type=\"application/json\" id=\"graph-data\">{}</script>",
            graph_data(report, &layout)?
        );
        let _ = writeln!(page, "<script>{}</script>", SCRIPT);
        page.push_str("</body>\n</html>\n");

        Ok(page)
    }
}
