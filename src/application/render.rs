//! SVG rendering of a laid-out tree.
//!
//! One `<line>` per parent/child edge, one `<circle>` per node and one
//! `<text>` per label line. Edges are drawn first so circles cover their ends.

use std::hash::Hash;

use tracing::{debug, instrument};

use crate::application::labels::{node_label, Labeler};
use crate::config::StyleConfig;
use crate::domain::{bounds, Point, Positions, Tree};

/// Line height as a multiple of the font size.
const LINE_HEIGHT: f64 = 1.2;

pub struct SvgRenderer<'s> {
    style: &'s StyleConfig,
}

impl<'s> SvgRenderer<'s> {
    pub fn new(style: &'s StyleConfig) -> Self {
        Self { style }
    }

    /// Render `tree` at the given positions into a standalone SVG document.
    ///
    /// Nodes missing from `positions` are skipped along with their edges.
    #[instrument(level = "debug", skip_all)]
    pub fn render<I, P, L>(
        &self,
        tree: &Tree<I, P>,
        positions: &Positions<'_, I, P>,
        labeler: &L,
    ) -> String
    where
        I: Eq + Hash,
        L: Labeler<I, P> + ?Sized,
    {
        let style = self.style;
        let margin = style.margin;
        let (offset, width, height) = match bounds(positions) {
            Some(b) => (
                Point::new(margin - b.min.x, margin - b.min.y),
                b.width() + 2.0 * margin,
                b.height() + 2.0 * margin,
            ),
            None => (Point::new(margin, margin), 2.0 * margin, 2.0 * margin),
        };
        let at = |p: Point| Point::new(p.x + offset.x, p.y + offset.y);

        let mut edges = String::new();
        let mut nodes = String::new();
        let mut count = 0usize;

        let walk = tree.root.iter().flat_map(|root| root.iter());
        for (node, _) in walk {
            let Some(placement) = positions.get(&node.id) else {
                continue;
            };
            let center = at(placement.point);

            for child in &node.children {
                if let Some(child_placement) = positions.get(&child.id) {
                    let end = at(child_placement.point);
                    edges.push_str(&format!(
                        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                        num(center.x),
                        num(center.y),
                        num(end.x),
                        num(end.y),
                        escape_xml(&style.edge_color),
                        num(style.stroke_width),
                    ));
                }
            }

            nodes.push_str(&format!(
                "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                num(center.x),
                num(center.y),
                num(style.node_radius),
                escape_xml(&style.fill_node),
                escape_xml(&style.stroke_node),
                num(style.stroke_width),
            ));

            let lines = node_label(node, labeler);
            let line_height = style.font_size * LINE_HEIGHT;
            let first_y = center.y - (lines.len().saturating_sub(1)) as f64 * line_height / 2.0;
            for (i, line) in lines.iter().enumerate() {
                nodes.push_str(&format!(
                    "  <text x=\"{}\" y=\"{}\" font-size=\"{}\" font-family=\"{}\" fill=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\">{}</text>\n",
                    num(center.x),
                    num(first_y + i as f64 * line_height),
                    num(style.font_size),
                    escape_xml(&style.font_family),
                    escape_xml(&style.fill_text),
                    escape_xml(line),
                ));
            }
            count += 1;
        }

        debug!(nodes = count, width, height, "rendered svg");
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{edges}{nodes}</svg>\n",
            w = num(width),
            h = num(height),
        )
    }
}

/// Format a coordinate with at most two decimals and no trailing zeros.
fn num(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::labels::{DisplayLabeler, IdLabeler};
    use crate::domain::{NodeKey, TreeNode};
    use std::fmt;

    fn style() -> StyleConfig {
        StyleConfig::default()
    }

    #[test]
    fn given_tree_when_rendering_then_svg_has_circles_lines_and_text() {
        let tree: Tree<&str, &str> = Tree::from_adjacency(
            vec![
                (NodeKey::Id("A"), vec![NodeKey::Id("B"), NodeKey::Id("C")]),
                (NodeKey::Id("B"), vec![]),
                (NodeKey::Id("C"), vec![]),
            ],
            None,
        )
        .unwrap();
        let positions = tree.positions(50.0, 100.0);
        let style = style();
        let svg = SvgRenderer::new(&style).render(&tree, &positions, &DisplayLabeler);

        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("<line").count(), 2);
        assert!(svg.contains(">A</text>"));
        assert!(svg.contains(">B</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn given_numeric_payloads_when_rendering_then_payload_text_present() {
        let tree: Tree<&str, i32> = Tree::from(
            TreeNode::with_payload("A", 123)
                .with_children(vec![TreeNode::with_payload("B", 456)]),
        );
        let positions = tree.positions(50.0, 100.0);
        let style = style();
        let svg = SvgRenderer::new(&style).render(&tree, &positions, &DisplayLabeler);
        assert!(svg.contains(">123</text>"));
        assert!(svg.contains(">456</text>"));
    }

    #[test]
    fn given_unprintable_payload_when_rendering_then_render_completes_without_it() {
        struct Unprintable;
        impl fmt::Display for Unprintable {
            fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Err(fmt::Error)
            }
        }

        let tree: Tree<&str, Unprintable> = Tree::from(
            TreeNode::with_payload("A", Unprintable).with_children(vec![TreeNode::new("B")]),
        );
        let positions = tree.positions(50.0, 100.0);
        let style = style();
        let svg = SvgRenderer::new(&style).render(&tree, &positions, &DisplayLabeler);
        assert!(svg.contains(">A</text>"));
        assert!(svg.contains(">B</text>"));
        assert_eq!(svg.matches("<text").count(), 2);
    }

    #[test]
    fn given_markup_in_label_when_rendering_then_escaped() {
        let tree: Tree<&str> = Tree::from(TreeNode::new("<a&b>"));
        let positions = tree.positions(50.0, 100.0);
        let style = style();
        let svg = SvgRenderer::new(&style).render(&tree, &positions, &IdLabeler);
        assert!(svg.contains("&lt;a&amp;b&gt;"));
    }

    #[test]
    fn given_margin_when_rendering_single_node_then_centered_in_canvas() {
        let tree: Tree<&str> = Tree::from(TreeNode::new("A"));
        let positions = tree.positions(50.0, 100.0);
        let style = StyleConfig {
            margin: 30.0,
            ..StyleConfig::default()
        };
        let svg = SvgRenderer::new(&style).render(&tree, &positions, &IdLabeler);
        assert!(svg.contains("width=\"60\" height=\"60\""));
        assert!(svg.contains("cx=\"30\" cy=\"30\""));
    }

    #[test]
    fn given_empty_tree_when_rendering_then_empty_canvas() {
        let tree: Tree<&str> = Tree::default();
        let positions = tree.positions(50.0, 100.0);
        let style = style();
        let svg = SvgRenderer::new(&style).render(&tree, &positions, &IdLabeler);
        assert!(!svg.contains("<circle"));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_num_trims_zeros() {
        assert_eq!(num(50.0), "50");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
    }
}
