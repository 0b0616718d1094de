//! Binary edge-list format.
//!
//! Layout (little-endian, 64-bit fields, no padding):
//!
//! ```text
//! nv: i64
//! ne: i64
//! edge_indices: (nv + 1) × i64
//! edges: ne × { tail: i64, weight: f64 }
//! ```
//!
//! Offsets are rebased on the first one, so files written for a sub-range of a larger graph
//! still load as a zero-based CSR. The graph is validated by [`CsrGraph::new`] after loading.

use super::{GraphReader, GraphWriter};
use crate::partitioning::csr::CsrGraph;
use crate::partitioning::error::GraphError;
use crate::partitioning::graph_traits::{Edge, LouvainGraph};
use bytemuck::{Pod, Zeroable};
use bytes::{Buf, BufMut};
use static_assertions::assert_eq_size;
use std::io::{Read, Write};

const WORD: usize = std::mem::size_of::<i64>();

/// On-disk edge record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
struct RawEdge {
    tail: i64,
    weight: f64,
}

assert_eq_size!(RawEdge, [u8; 16]);

/// Reader/writer for the binary edge-list format.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryEdgeList {
    /// Replace every stored weight with `1.0` on load.
    pub unit_weight: bool,
}

impl BinaryEdgeList {
    pub fn new(unit_weight: bool) -> Self {
        Self { unit_weight }
    }
}

fn header_count(field: &'static str, value: i64) -> Result<usize, GraphError> {
    usize::try_from(value).map_err(|_| GraphError::InvalidHeader { field, value })
}

fn section_len(section: &'static str, count: usize, width: usize) -> Result<usize, GraphError> {
    count
        .checked_mul(width)
        .ok_or(GraphError::InvalidHeader {
            field: section,
            value: count as i64,
        })
}

fn ensure(buf: &[u8], section: &'static str, expected: usize) -> Result<(), GraphError> {
    if buf.remaining() < expected {
        return Err(GraphError::Truncated {
            section,
            expected,
            found: buf.remaining(),
        });
    }
    Ok(())
}

impl GraphReader for BinaryEdgeList {
    fn read<R: Read>(&self, mut reader: R) -> Result<CsrGraph, GraphError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let mut buf = &data[..];

        ensure(buf, "header", 2 * WORD)?;
        let nv_raw = buf.get_i64_le();
        let ne_raw = buf.get_i64_le();
        let nv = header_count("vertex count", nv_raw)?;
        let ne = header_count("edge count", ne_raw)?;

        let offsets_len = nv.checked_add(1).ok_or(GraphError::InvalidHeader {
            field: "vertex count",
            value: nv_raw,
        })?;
        ensure(buf, "edge offsets", section_len("edge offsets", offsets_len, WORD)?)?;
        let mut raw_offsets = Vec::with_capacity(offsets_len);
        for _ in 0..offsets_len {
            raw_offsets.push(buf.get_i64_le());
        }
        let base = raw_offsets[0];
        let edge_indices = raw_offsets
            .iter()
            .map(|&off| {
                off.checked_sub(base)
                    .and_then(|d| usize::try_from(d).ok())
                    .ok_or(GraphError::InvalidHeader {
                        field: "edge offset",
                        value: off,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let edge_bytes = section_len("edges", ne, std::mem::size_of::<RawEdge>())?;
        ensure(buf, "edges", edge_bytes)?;
        let raw: Vec<RawEdge> = bytemuck::pod_collect_to_vec(&buf[..edge_bytes]);
        let edge_list = raw
            .iter()
            .enumerate()
            .map(|(edge, r)| {
                let tail = usize::try_from(r.tail)
                    .map_err(|_| GraphError::NegativeTail { edge, tail: r.tail })?;
                let weight = if self.unit_weight { 1.0 } else { r.weight };
                Ok(Edge::new(tail, weight))
            })
            .collect::<Result<Vec<_>, GraphError>>()?;

        log::debug!("binary edge list: {nv} vertices, {ne} edges");
        CsrGraph::new(edge_indices, edge_list)
    }
}

impl GraphWriter for BinaryEdgeList {
    fn write<W: Write>(&self, mut writer: W, graph: &CsrGraph) -> Result<(), GraphError> {
        let nv = graph.vertex_count();
        let ne = graph.edge_count();
        let mut out = Vec::with_capacity((2 + nv + 1) * WORD + ne * 2 * WORD);
        out.put_i64_le(nv as i64);
        out.put_i64_le(ne as i64);
        for &off in graph.edge_indices() {
            out.put_i64_le(off as i64);
        }
        for e in graph.edge_list() {
            let weight = if self.unit_weight { 1.0 } else { e.weight };
            out.put_slice(bytemuck::bytes_of(&RawEdge {
                tail: e.tail as i64,
                weight,
            }));
        }
        writer.write_all(&out)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(nv: i64, ne: i64, offsets: &[i64], edges: &[(i64, f64)]) -> Vec<u8> {
        let mut out = Vec::new();
        out.put_i64_le(nv);
        out.put_i64_le(ne);
        for &o in offsets {
            out.put_i64_le(o);
        }
        for &(t, w) in edges {
            out.put_i64_le(t);
            out.put_f64_le(w);
        }
        out
    }

    #[test]
    fn reads_two_vertex_graph() {
        let bytes = encode(2, 2, &[0, 1, 2], &[(1, 2.5), (0, 2.5)]);
        let g = BinaryEdgeList::default().read(&bytes[..]).unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.neighbors(0), &[Edge::new(1, 2.5)]);
    }

    #[test]
    fn unit_weight_override() {
        let bytes = encode(2, 2, &[0, 1, 2], &[(1, 2.5), (0, 2.5)]);
        let g = BinaryEdgeList::new(true).read(&bytes[..]).unwrap();
        assert!(g.edge_list().iter().all(|e| e.weight == 1.0));
    }

    #[test]
    fn rebases_offsets() {
        let bytes = encode(2, 1, &[10, 11, 11], &[(1, 1.0)]);
        let g = BinaryEdgeList::default().read(&bytes[..]).unwrap();
        assert_eq!(g.edge_indices(), &[0, 1, 1]);
    }

    #[test]
    fn truncated_edges() {
        let mut bytes = encode(2, 2, &[0, 1, 2], &[(1, 1.0), (0, 1.0)]);
        bytes.truncate(bytes.len() - 4);
        let err = BinaryEdgeList::default().read(&bytes[..]).unwrap_err();
        assert!(matches!(err, GraphError::Truncated { section: "edges", .. }));
    }

    #[test]
    fn negative_counts_and_tails() {
        let bytes = encode(-1, 0, &[], &[]);
        assert!(matches!(
            BinaryEdgeList::default().read(&bytes[..]),
            Err(GraphError::InvalidHeader { field: "vertex count", value: -1 })
        ));
        let bytes = encode(1, 1, &[0, 1], &[(-3, 1.0)]);
        assert!(matches!(
            BinaryEdgeList::default().read(&bytes[..]),
            Err(GraphError::NegativeTail { edge: 0, tail: -3 })
        ));
    }

    #[test]
    fn tail_out_of_range_is_rejected() {
        let bytes = encode(1, 1, &[0, 1], &[(5, 1.0)]);
        assert!(matches!(
            BinaryEdgeList::default().read(&bytes[..]),
            Err(GraphError::TailOutOfRange { tail: 5, .. })
        ));
    }

    #[test]
    fn writer_output_reads_back() {
        let g = CsrGraph::from_undirected(3, &[(0, 1, 0.5), (1, 2, 4.0), (2, 2, 1.0)]).unwrap();
        let mut bytes = Vec::new();
        BinaryEdgeList::default().write(&mut bytes, &g).unwrap();
        assert_eq!(bytes.len(), 2 * 8 + 4 * 8 + g.edge_count() * 16);
        let back = BinaryEdgeList::default().read(&bytes[..]).unwrap();
        assert_eq!(back, g);
    }
}
