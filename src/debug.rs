use std::{collections::VecDeque, fmt};

use crate::{node::NodeId, AvlTree};

impl AvlTree {
    /// Writes the tree as a Graphviz digraph, one rank per depth.
    ///
    /// Nodes are labelled `value:balance_factor`; missing children are drawn as points.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let root = match self.root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            Node(NodeId),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _ in 0..queue.len() {
                let node = match queue.pop_front() {
                    Some(Item::Node(node)) => node,
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                let value = self[node].value();
                let balance = self.balance_factor(node);
                write!(w, "\"graph{name}-{value}\" [label=\"{value}:{balance}\"]; ")?;

                for child in self[node].children() {
                    match child {
                        Some(child) => {
                            let child_value = self[child].value();

                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-{value}\" -> \"graph{name}-{child_value}\";"
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-{value}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }

    /// Renders the tree one depth per line, each node as `|value| `, from left to right.
    pub fn render_levels(&self) -> String {
        let mut out = String::new();
        let mut level: Vec<NodeId> = self.root.into_iter().collect();

        while !level.is_empty() {
            let mut next = Vec::with_capacity(level.len() * 2);

            for &node in &level {
                out.push('|');
                out.push_str(&self[node].value().to_string());
                out.push_str("| ");
                next.extend(self[node].children().into_iter().flatten());
            }

            out.push('\n');
            level = next;
        }

        out
    }
}
