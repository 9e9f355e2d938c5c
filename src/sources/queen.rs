use crate::{
    components::{ArgStream, Configurable, DominationInstance, InputSource},
    errors::{ConfigError, Result},
    graph::{AdjArray, GraphNew, Node, MAX_VERTS},
};

/// Generates queen graphs: one vertex per cell of an n×n board, edges
/// between cells sharing a row, column or diagonal. `-n` generates a
/// single board, `-start`/`-end` a range of board sizes.
#[derive(Default)]
pub struct QueenGraphSource {
    n_start: Option<u32>,
    n_end: Option<u32>,
}

/// Builds the queen graph of an n×n board.
pub fn queen_graph(n: u32) -> AdjArray {
    let mut graph = AdjArray::new((n * n) as Node);

    for vi in 0..n as i64 {
        for vj in 0..n as i64 {
            let v = (vi * n as i64 + vj) as Node;
            let mut push = |ui: i64, uj: i64| {
                if ui < 0 || ui >= n as i64 || uj < 0 || uj >= n as i64 {
                    return;
                }
                let u = (ui * n as i64 + uj) as Node;
                if u != v {
                    graph.push_neighbor(v, u);
                }
            };

            for uj in 0..n as i64 {
                push(vi, uj);
            }
            for ui in 0..n as i64 {
                push(ui, vj);
            }
            for k in -(n as i64)..n as i64 {
                push(vi + k, vj + k);
            }
            for k in -(n as i64)..n as i64 {
                push(vi + k, vj - k);
            }
        }
    }

    graph
}

impl Configurable for QueenGraphSource {
    fn accept_argument(&mut self, arg: &str, args: &mut ArgStream) -> Result<bool> {
        match arg {
            "-n" => {
                let n = args.next_u32()?;
                self.n_start = Some(n);
                self.n_end = Some(n);
            }
            "-start" => self.n_start = Some(args.next_u32()?),
            "-end" => self.n_end = Some(args.next_u32()?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl InputSource for QueenGraphSource {
    fn read_next(&mut self) -> Result<Option<DominationInstance>> {
        let (start, end) = match (self.n_start, self.n_end) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                return Err(ConfigError::MissingParameter(
                    "no size parameter (-n) specified for the queen generator".into(),
                ))
            }
        };

        if start > end {
            return Ok(None);
        }
        if (start as usize).pow(2) >= MAX_VERTS {
            return Err(ConfigError::TooManyVertices((start as usize).pow(2)));
        }

        self.n_start = Some(start + 1);
        Ok(Some(DominationInstance::new(queen_graph(start))))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        components::ArgStream,
        graph::{AdjacencyList, AdjacencyTest, GraphNodeOrder},
    };

    #[test]
    fn queen_4_structure() {
        let graph = queen_graph(4);
        assert_eq!(graph.number_of_nodes(), 16);

        // corner cell 0 sees its row, column and main diagonal
        let mut corner = graph.neighbors_of(0).to_vec();
        corner.sort_unstable();
        assert_eq!(corner, vec![1, 2, 3, 4, 5, 8, 10, 12, 15]);

        // symmetric relation, no loops
        for v in graph.vertices() {
            assert!(!graph.has_edge(v, v));
            for &u in graph.neighbors_of(v) {
                assert!(graph.has_edge(u, v));
            }
        }
    }

    #[test]
    fn range_generation() {
        let mut source = QueenGraphSource::default();
        let args: Vec<String> = ["-start", "2", "-end", "3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        source.configure(&mut ArgStream::new(&args)).unwrap();

        assert_eq!(
            source
                .read_next()
                .unwrap()
                .unwrap()
                .graph
                .number_of_nodes(),
            4
        );
        assert_eq!(
            source
                .read_next()
                .unwrap()
                .unwrap()
                .graph
                .number_of_nodes(),
            9
        );
        assert!(source.read_next().unwrap().is_none());
    }

    #[test]
    fn missing_size_is_an_error() {
        let mut source = QueenGraphSource::default();
        assert!(source.read_next().is_err());
    }
}
