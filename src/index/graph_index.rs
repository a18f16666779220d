//! Flat navigable-graph index
//!
//! Single-layer small-world graph over a fixed-stride arena:
//! - Strided entry-point probing
//! - Beam search for insertion and query
//! - Heuristic neighbor selection with back-link repair
//! - Locality reordering of the arena (see [`crate::reorder`])

use super::heap::Candidate;
use super::pruner::{diversify, nearest_prune, select_neighbors};
use super::search::{beam_search, search_initialization};
use super::store::NodeStore;
use super::visited::VisitedMarker;
use crate::config::IndexConfig;
use crate::distance::DistanceMetric;
use crate::error::{IndexError, Result};
use crate::reorder::{check_weights, ProfileAlgorithm, ReorderAlgorithm, ReorderParams};
use crate::stats::IndexStats;
use crate::types::{AdjacencyTable, EdgeWeights, Label, NodeId};
use std::sync::Arc;
use std::time::Instant;

/// Approximate nearest-neighbor index over a flat graph
pub struct GraphIndex<L: Label = u32> {
    pub(crate) store: NodeStore<L>,
    pub(crate) metric: Arc<dyn DistanceMetric>,
    /// Scratch marker shared by every `&mut self` search and by relabeling
    visited: VisitedMarker,
    pub(crate) config: IndexConfig,
}

impl<L: Label> GraphIndex<L> {
    /// Create an empty index for `max_nodes` vectors with out-degree `max_degree`
    pub fn new(metric: Arc<dyn DistanceMetric>, max_nodes: usize, max_degree: usize) -> Result<Self> {
        Self::with_config(metric, IndexConfig::new(max_nodes, max_degree))
    }

    pub fn with_config(metric: Arc<dyn DistanceMetric>, config: IndexConfig) -> Result<Self> {
        config.validate()?;
        if metric.data_size() == 0 {
            return Err(IndexError::InvalidArgument(
                "metric reports a zero-byte vector".to_string(),
            ));
        }
        let store = NodeStore::new(metric.data_size(), config.max_degree, config.max_nodes)?;
        Ok(Self::from_parts(store, metric, config))
    }

    pub(crate) fn from_parts(
        store: NodeStore<L>,
        metric: Arc<dyn DistanceMetric>,
        config: IndexConfig,
    ) -> Self {
        let visited = VisitedMarker::new(store.max_nodes() + 1);
        Self {
            store,
            metric,
            visited,
            config,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn metric(&self) -> &Arc<dyn DistanceMetric> {
        &self.metric
    }

    /// Number of stored nodes
    pub fn size(&self) -> usize {
        self.store.len()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.max_nodes()
    }

    pub fn max_degree(&self) -> usize {
        self.store.max_degree()
    }

    /// Size in bytes of one vector
    pub fn data_size(&self) -> usize {
        self.store.data_size()
    }

    pub fn node_label(&self, id: NodeId) -> Option<L> {
        ((id as usize) < self.store.len()).then(|| self.store.label(id))
    }

    pub fn node_data(&self, id: NodeId) -> Option<&[u8]> {
        ((id as usize) < self.store.len()).then(|| self.store.data(id))
    }

    fn check_dimension(&self, data: &[u8]) -> Result<()> {
        if data.len() != self.store.data_size() {
            return Err(IndexError::DimensionMismatch {
                expected: self.store.data_size(),
                actual: data.len(),
            });
        }
        Ok(())
    }

    fn check_node(&self, id: NodeId) -> Result<()> {
        if (id as usize) >= self.store.len() {
            return Err(IndexError::InvalidArgument(format!(
                "node {} out of range ({} nodes)",
                id,
                self.store.len()
            )));
        }
        Ok(())
    }

    #[inline]
    fn node_distance(&self, a: NodeId, b: NodeId) -> f32 {
        self.metric.distance(self.store.data(a), self.store.data(b))
    }

    /// Insert a vector using the configured number of entry probes.
    ///
    /// Returns `Ok(true)` when the node was stored and linked into the graph.
    /// The very first node of an empty index is stored but has nothing to
    /// link to, and reports `Ok(false)`.
    pub fn add(&mut self, data: &[u8], label: L, ef_construction: usize) -> Result<bool> {
        let n_initializations = self.config.n_initializations;
        self.add_with_initializations(data, label, ef_construction, n_initializations)
    }

    pub fn add_with_initializations(
        &mut self,
        data: &[u8],
        label: L,
        ef_construction: usize,
        n_initializations: usize,
    ) -> Result<bool> {
        self.check_dimension(data)?;

        // Probe before allocating: the new node would otherwise win the probe
        // at distance zero while having no links to search from.
        let entry = search_initialization(&self.store, self.metric.as_ref(), data, n_initializations);
        let new_id = self.store.allocate(data, label)?;

        let Some(entry) = entry else {
            tracing::debug!("first node stored without links");
            return Ok(false);
        };

        let found = beam_search(
            &self.store,
            self.metric.as_ref(),
            &mut self.visited,
            data,
            entry,
            ef_construction,
            |_, _| {},
        );
        let selected = select_neighbors(found.into_sorted_vec(), self.store.max_degree(), |a, b| {
            self.node_distance(a, b)
        });
        self.connect_neighbors(new_id, &selected);

        Ok(true)
    }

    /// Insert every row of a row-major buffer, labeling row `i` with `labels[i]`.
    ///
    /// Stops at the first failure; rows inserted before it stay in the index.
    /// Returns the number of rows inserted.
    pub fn add_batch(&mut self, data: &[u8], labels: &[L], ef_construction: usize) -> Result<usize> {
        let row = self.store.data_size();
        if data.len() != labels.len() * row {
            return Err(IndexError::DimensionMismatch {
                expected: labels.len() * row,
                actual: data.len(),
            });
        }
        for (vector, &label) in data.chunks_exact(row).zip(labels) {
            self.add(vector, label, ef_construction)?;
        }
        Ok(labels.len())
    }

    /// Link `new_id` to `selected` and add the reverse edges.
    ///
    /// A neighbor with a free slot simply gains the back-link. A full
    /// neighbor re-runs selection over its current links plus the new node
    /// and keeps the result, which may drop one of its older edges.
    fn connect_neighbors(&mut self, new_id: NodeId, selected: &[Candidate]) {
        let ids: Vec<NodeId> = selected.iter().map(|c| c.id).collect();
        self.store.links_mut(new_id).assign(&ids);

        for &neighbor in &ids {
            let mut links = self.store.links_mut(neighbor);
            if let Some(slot) = links.first_empty() {
                links.set(slot, new_id);
                continue;
            }

            let kept = self.pruned_links(neighbor, new_id);
            self.store.links_mut(neighbor).assign(&kept);
        }
    }

    /// Neighbor selection over `node`'s current links plus `extra`
    fn pruned_links(&self, node: NodeId, extra: NodeId) -> Vec<NodeId> {
        let pool: Vec<Candidate> = std::iter::once(extra)
            .chain(self.store.links(node).neighbors())
            .map(|n| Candidate::new(n, self.node_distance(node, n)))
            .collect();

        select_neighbors(pool, self.store.max_degree(), |a, b| self.node_distance(a, b))
            .into_iter()
            .map(|c| c.id)
            .collect()
    }

    /// Run the diversity rule over the current links of `node`.
    ///
    /// Unlike back-link repair this filters even a list that fits in M slots.
    pub fn reprune(&mut self, node: NodeId) -> Result<()> {
        self.check_node(node)?;
        let pool: Vec<Candidate> = self
            .store
            .links(node)
            .neighbors()
            .map(|n| Candidate::new(n, self.node_distance(node, n)))
            .collect();
        let kept: Vec<NodeId> = diversify(pool, self.store.max_degree(), |a, b| {
            self.node_distance(a, b)
        })
        .into_iter()
        .map(|c| c.id)
        .collect();
        self.store.links_mut(node).assign(&kept);
        Ok(())
    }

    /// Replace every node's links with the (up to) M nearest entries of `table`
    pub fn rewire(&mut self, table: &AdjacencyTable) -> Result<()> {
        let len = self.store.len();
        if table.len() < len {
            return Err(IndexError::InvalidArgument(format!(
                "adjacency table has {} rows, index has {} nodes",
                table.len(),
                len
            )));
        }
        if let Some(bad) = table[..len].iter().flatten().find(|&&n| n as usize >= len) {
            return Err(IndexError::InvalidArgument(format!(
                "adjacency table references node {} ({} nodes)",
                bad, len
            )));
        }

        for node in 0..len as NodeId {
            let mut targets: Vec<NodeId> = table[node as usize]
                .iter()
                .copied()
                .filter(|&n| n != node)
                .collect();
            targets.sort_unstable();
            targets.dedup();

            let pool: Vec<Candidate> = targets
                .into_iter()
                .map(|n| Candidate::new(n, self.node_distance(node, n)))
                .collect();
            let kept: Vec<NodeId> = nearest_prune(pool, self.store.max_degree())
                .into_iter()
                .map(|c| c.id)
                .collect();
            self.store.links_mut(node).assign(&kept);
        }
        Ok(())
    }

    /// Top-`k` search with the configured number of entry probes.
    ///
    /// Returns `(distance, label)` pairs, nearest first.
    pub fn search(&mut self, query: &[u8], k: usize, ef_search: usize) -> Result<Vec<(f32, L)>> {
        let n_initializations = self.config.n_initializations;
        self.search_with_initializations(query, k, ef_search, n_initializations)
    }

    pub fn search_with_initializations(
        &mut self,
        query: &[u8],
        k: usize,
        ef_search: usize,
        n_initializations: usize,
    ) -> Result<Vec<(f32, L)>> {
        self.check_dimension(query)?;
        let found = Self::top_k(
            &self.store,
            self.metric.as_ref(),
            &mut self.visited,
            query,
            k,
            ef_search,
            n_initializations,
        );
        Ok(found
            .into_iter()
            .map(|c| (c.distance, self.store.label(c.id)))
            .collect())
    }

    /// Search a shared index with caller-owned scratch state.
    ///
    /// `visited` must hold at least `capacity() + 1` entries; see
    /// [`GraphIndex::new_visited_marker`].
    pub fn search_with(
        &self,
        visited: &mut VisitedMarker,
        query: &[u8],
        k: usize,
        ef_search: usize,
    ) -> Result<Vec<(f32, L)>> {
        self.check_dimension(query)?;
        if visited.capacity() < self.store.len() {
            return Err(IndexError::InvalidArgument(format!(
                "visited marker holds {} entries, index has {} nodes",
                visited.capacity(),
                self.store.len()
            )));
        }
        let found = Self::top_k(
            &self.store,
            self.metric.as_ref(),
            visited,
            query,
            k,
            ef_search,
            self.config.n_initializations,
        );
        Ok(found
            .into_iter()
            .map(|c| (c.distance, self.store.label(c.id)))
            .collect())
    }

    /// A visited marker sized for this index, for use with [`GraphIndex::search_with`]
    pub fn new_visited_marker(&self) -> VisitedMarker {
        VisitedMarker::new(self.store.max_nodes() + 1)
    }

    /// Like [`GraphIndex::search`] but returns internal node ids
    pub fn location_search(&mut self, query: &[u8], k: usize, ef_search: usize) -> Result<Vec<NodeId>> {
        self.check_dimension(query)?;
        let found = Self::top_k(
            &self.store,
            self.metric.as_ref(),
            &mut self.visited,
            query,
            k,
            ef_search,
            self.config.n_initializations,
        );
        Ok(found.into_iter().map(|c| c.id).collect())
    }

    fn top_k(
        store: &NodeStore<L>,
        metric: &dyn DistanceMetric,
        visited: &mut VisitedMarker,
        query: &[u8],
        k: usize,
        ef_search: usize,
        n_initializations: usize,
    ) -> Vec<Candidate> {
        let Some(entry) = search_initialization(store, metric, query, n_initializations) else {
            return Vec::new();
        };
        let mut found = beam_search(store, metric, visited, query, entry, ef_search, |_, _| {});
        found.truncate(k);
        found.into_sorted_vec()
    }

    /// Run one query and count edge traversals into `weights`.
    ///
    /// `table`/`weights` must come from [`GraphIndex::graph`] on the current
    /// arena; each step `from -> to` onto an unvisited node adds 1 to the
    /// weight of that edge. Search results are discarded.
    pub fn profile_search(
        &mut self,
        query: &[u8],
        ef_search: usize,
        table: &AdjacencyTable,
        weights: &mut EdgeWeights,
    ) -> Result<()> {
        self.check_dimension(query)?;
        if table.len() != self.store.len() {
            return Err(IndexError::InvalidArgument(format!(
                "profiling table has {} rows, index has {} nodes",
                table.len(),
                self.store.len()
            )));
        }
        check_weights(table, weights)?;
        let Some(entry) = search_initialization(
            &self.store,
            self.metric.as_ref(),
            query,
            self.config.n_initializations,
        ) else {
            return Ok(());
        };

        beam_search(
            &self.store,
            self.metric.as_ref(),
            &mut self.visited,
            query,
            entry,
            ef_search,
            |from, to| {
                let row = &table[from as usize];
                for (pos, &n) in row.iter().enumerate() {
                    if n == to {
                        weights[from as usize][pos] += 1.0;
                    }
                }
            },
        );
        Ok(())
    }

    /// Outbound adjacency of every node, empty slots excluded
    pub fn graph(&self) -> AdjacencyTable {
        self.store.adjacency_table()
    }

    /// Relabel nodes with `algorithm` to improve traversal locality.
    ///
    /// Node ids change; labels, vectors and topology do not.
    pub fn reorder(&mut self, algorithm: ReorderAlgorithm) -> Result<()> {
        let start = Instant::now();
        let table = self.graph();
        let perm = algorithm.permutation(&table, &ReorderParams::from(&self.config));
        self.store.relabel(&perm)?;
        tracing::info!(
            algorithm = %algorithm,
            nodes = table.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "graph reordered"
        );
        Ok(())
    }

    /// Profile-guided reordering.
    ///
    /// `queries` is a row-major buffer of representative queries; each is
    /// searched with `ef_search` and the traversed edges are weighted before
    /// `algorithm` computes the permutation.
    pub fn profile_reorder(
        &mut self,
        queries: &[u8],
        ef_search: usize,
        algorithm: ProfileAlgorithm,
    ) -> Result<()> {
        let row = self.store.data_size();
        if queries.len() % row != 0 {
            return Err(IndexError::DimensionMismatch {
                expected: row,
                actual: queries.len() % row,
            });
        }

        let start = Instant::now();
        let table = self.graph();
        let mut weights: EdgeWeights = table.iter().map(|r| vec![1.0; r.len()]).collect();
        for query in queries.chunks_exact(row) {
            self.profile_search(query, ef_search, &table, &mut weights)?;
        }
        tracing::debug!(queries = queries.len() / row, "traversal profile collected");

        let perm = algorithm.permutation(&table, &weights, self.config.gorder_window)?;
        self.store.relabel(&perm)?;
        tracing::info!(
            algorithm = %algorithm,
            nodes = table.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "graph reordered from profile"
        );
        Ok(())
    }

    /// Apply an externally computed permutation (`perm[old] = new`)
    pub fn relabel(&mut self, perm: &[NodeId]) -> Result<()> {
        self.store.relabel(perm)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats::from_table(&self.graph(), self.store.max_nodes())
    }
}

impl GraphIndex<u32> {
    /// Insert rows labeled with consecutive integers starting at `size()`
    pub fn add_batch_auto(&mut self, data: &[u8], ef_construction: usize) -> Result<usize> {
        let row = self.store.data_size();
        let rows = data.len() / row;
        let first = self.store.len() as u32;
        let labels: Vec<u32> = (first..first + rows as u32).collect();
        self.add_batch(data, &labels, ef_construction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::L2Space;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const DIM: usize = 8;

    fn random_vectors(n: usize, seed: u64) -> Vec<Vec<f32>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| (0..DIM).map(|_| rng.gen::<f32>()).collect())
            .collect()
    }

    fn bytes(v: &[f32]) -> &[u8] {
        bytemuck::cast_slice(v)
    }

    fn build(n: usize, max_degree: usize) -> (GraphIndex<u32>, Vec<Vec<f32>>) {
        let vectors = random_vectors(n, 7);
        let mut index = GraphIndex::new(Arc::new(L2Space::new(DIM)), n, max_degree).unwrap();
        for (i, v) in vectors.iter().enumerate() {
            index.add(bytes(v), i as u32, 50).unwrap();
        }
        (index, vectors)
    }

    fn assert_degree_bound(index: &GraphIndex<u32>) {
        for row in index.graph() {
            assert!(row.len() <= index.max_degree());
        }
    }

    #[test]
    fn test_first_insertion_reports_false() {
        let mut index = GraphIndex::<u32>::new(Arc::new(L2Space::new(2)), 4, 2).unwrap();
        let first = [1.0f32, 2.0];
        assert!(!index.add(bytes(&first), 10, 10).unwrap());
        assert_eq!(index.size(), 1);
        assert_eq!(index.node_data(0), Some(bytes(&first)));
        assert_eq!(index.node_label(0), Some(10));

        assert!(index.add(bytes(&[3.0, 4.0]), 11, 10).unwrap());
        assert_eq!(index.graph(), vec![vec![1], vec![0]]);
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut index = GraphIndex::<u32>::new(Arc::new(L2Space::new(1)), 2, 2).unwrap();
        index.add(bytes(&[0.0]), 0, 10).unwrap();
        index.add(bytes(&[1.0]), 1, 10).unwrap();
        let before = index.graph();

        let err = index.add(bytes(&[2.0]), 2, 10).unwrap_err();
        assert!(matches!(err, IndexError::CapacityExceeded { max_nodes: 2 }));
        assert_eq!(index.size(), 2);
        assert_eq!(index.graph(), before);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut index = GraphIndex::<u32>::new(Arc::new(L2Space::new(4)), 8, 2).unwrap();
        let err = index.add(bytes(&[0.0, 1.0]), 0, 10).unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch { expected: 16, actual: 8 }
        ));
        assert!(index.is_empty());

        let err = index.search(bytes(&[0.0]), 1, 10).unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_search_empty_index() {
        let mut index = GraphIndex::<u32>::new(Arc::new(L2Space::new(2)), 8, 2).unwrap();
        assert!(index.search(bytes(&[0.0, 0.0]), 3, 10).unwrap().is_empty());
    }

    #[test]
    fn test_search_recall_sanity() {
        let (mut index, vectors) = build(100, 8);
        assert_eq!(index.size(), 100);
        assert_degree_bound(&index);

        let queries = random_vectors(10, 99);
        for q in &queries {
            let results = index.search(bytes(q), 5, 50).unwrap();
            assert_eq!(results.len(), 5);
            for pair in results.windows(2) {
                assert!(pair[0].0 <= pair[1].0);
            }
            let mut labels: Vec<u32> = results.iter().map(|r| r.1).collect();
            labels.sort();
            labels.dedup();
            assert_eq!(labels.len(), 5);
        }

        for (i, v) in vectors.iter().enumerate() {
            let results = index.search(bytes(v), 1, 50).unwrap();
            assert_eq!(results[0].1, i as u32);
            assert_eq!(results[0].0, 0.0);
        }
    }

    #[test]
    fn test_search_matches_brute_force_mostly() {
        let (mut index, vectors) = build(300, 12);
        let queries = random_vectors(20, 1234);
        let metric = L2Space::new(DIM);
        let mut hits = 0;
        for q in &queries {
            let mut exact: Vec<(f32, u32)> = vectors
                .iter()
                .enumerate()
                .map(|(i, v)| (metric.distance(bytes(q), bytes(v)), i as u32))
                .collect();
            exact.sort_by(|a, b| a.0.total_cmp(&b.0));
            let truth: Vec<u32> = exact.iter().take(10).map(|e| e.1).collect();

            let found = index.search(bytes(q), 10, 100).unwrap();
            hits += found.iter().filter(|r| truth.contains(&r.1)).count();
        }
        // 200 true neighbors in total
        assert!(hits >= 160, "recall too low: {}/200", hits);
    }

    #[test]
    fn test_location_search_returns_node_ids() {
        let (mut index, vectors) = build(50, 6);
        let ids = index.location_search(bytes(&vectors[17]), 3, 20).unwrap();
        assert_eq!(ids.len(), 3);
        // labels equal insertion positions before any reorder
        assert_eq!(ids[0], 17);
    }

    #[test]
    fn test_search_with_external_marker() {
        let (mut index, vectors) = build(60, 6);
        let expected = index.search(bytes(&vectors[3]), 4, 30).unwrap();

        let mut visited = index.new_visited_marker();
        let shared = &index;
        let found = shared.search_with(&mut visited, bytes(&vectors[3]), 4, 30).unwrap();
        assert_eq!(found, expected);

        let mut tiny = VisitedMarker::new(2);
        assert!(matches!(
            shared.search_with(&mut tiny, bytes(&vectors[3]), 4, 30),
            Err(IndexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_back_links_respect_degree_bound() {
        // many points crowd around the origin so early nodes fill up
        let mut index = GraphIndex::<u32>::new(Arc::new(L2Space::new(2)), 64, 3).unwrap();
        for i in 0..64u32 {
            let angle = i as f32 * 0.7;
            let radius = 1.0 + (i % 5) as f32;
            let v = [radius * angle.cos(), radius * angle.sin()];
            index.add(bytes(&v), i, 16).unwrap();
        }
        for row in index.graph() {
            assert!(row.len() <= 3);
            let mut unique = row.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), row.len());
        }
    }

    #[test]
    fn test_reorder_preserves_topology_and_results() {
        let algorithms = [
            ReorderAlgorithm::Gorder,
            ReorderAlgorithm::InDegree,
            ReorderAlgorithm::OutDegree,
            ReorderAlgorithm::Rcm,
            ReorderAlgorithm::Rcm2Hop,
            ReorderAlgorithm::HubSort,
            ReorderAlgorithm::HubCluster,
            ReorderAlgorithm::Dbg,
            ReorderAlgorithm::BcOrder,
        ];
        let queries = random_vectors(5, 3);

        for algorithm in algorithms {
            let (mut index, _) = build(100, 8);
            let expected: Vec<_> = queries
                .iter()
                .map(|q| index.search(bytes(q), 5, 40).unwrap())
                .collect();
            let before = index.graph();
            let labels_before: Vec<u32> = (0..100).map(|i| index.node_label(i).unwrap()).collect();

            index.reorder(algorithm).unwrap();
            assert_eq!(index.size(), 100);

            // map old id -> new id through the labels
            let mut new_id_of_label = vec![0 as NodeId; 100];
            for id in 0..100 {
                new_id_of_label[index.node_label(id).unwrap() as usize] = id;
            }
            let after = index.graph();
            for (old, row) in before.iter().enumerate() {
                let new = new_id_of_label[labels_before[old] as usize];
                let mut mapped: Vec<NodeId> = row
                    .iter()
                    .map(|&j| new_id_of_label[labels_before[j as usize] as usize])
                    .collect();
                let mut actual = after[new as usize].clone();
                mapped.sort();
                actual.sort();
                assert_eq!(actual, mapped, "{} broke node {}", algorithm, old);
            }

            for (q, want) in queries.iter().zip(&expected) {
                assert_eq!(&index.search(bytes(q), 5, 40).unwrap(), want, "{}", algorithm);
            }
        }
    }

    #[test]
    fn test_profile_reorder() {
        for algorithm in [ProfileAlgorithm::Gorder, ProfileAlgorithm::Rcm] {
            let (mut index, vectors) = build(80, 6);
            let queries: Vec<f32> = random_vectors(10, 5).concat();
            index
                .profile_reorder(bytemuck::cast_slice(&queries), 20, algorithm)
                .unwrap();
            assert_eq!(index.size(), 80);
            let results = index.search(bytes(&vectors[42]), 1, 20).unwrap();
            assert_eq!(results[0].1, 42);
        }
    }

    #[test]
    fn test_profile_reorder_rejects_partial_query() {
        let (mut index, _) = build(10, 4);
        let err = index
            .profile_reorder(&[0u8; 10], 10, ProfileAlgorithm::Gorder)
            .unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_profile_search_counts_traversals() {
        let (mut index, vectors) = build(40, 4);
        let table = index.graph();
        let mut weights: EdgeWeights = table.iter().map(|r| vec![1.0; r.len()]).collect();
        index
            .profile_search(bytes(&vectors[5]), 10, &table, &mut weights)
            .unwrap();
        let total: f32 = weights.iter().flatten().sum();
        let edges: usize = table.iter().map(|r| r.len()).sum();
        assert!(total >= edges as f32);
    }

    #[test]
    fn test_profile_search_rejects_misshapen_weights() {
        let (mut index, vectors) = build(8, 4);
        let table = index.graph();
        let query = bytes(&vectors[2]);

        let mut empty_rows: EdgeWeights = vec![vec![]; 8];
        assert!(matches!(
            index.profile_search(query, 10, &table, &mut empty_rows),
            Err(IndexError::InvalidArgument(_))
        ));

        let mut too_few_rows: EdgeWeights = table.iter().take(4).map(|r| vec![1.0; r.len()]).collect();
        assert!(matches!(
            index.profile_search(query, 10, &table, &mut too_few_rows),
            Err(IndexError::InvalidArgument(_))
        ));

        let mut wrong_table = table.clone();
        wrong_table.pop();
        let mut weights: EdgeWeights = wrong_table.iter().map(|r| vec![1.0; r.len()]).collect();
        assert!(matches!(
            index.profile_search(query, 10, &wrong_table, &mut weights),
            Err(IndexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rewire_keeps_nearest() {
        let mut index = GraphIndex::<u32>::new(Arc::new(L2Space::new(1)), 5, 2).unwrap();
        for i in 0..5u32 {
            index.add(bytes(&[i as f32]), i, 10).unwrap();
        }
        let table = vec![
            vec![4, 1, 2, 0],
            vec![0],
            vec![],
            vec![0, 1, 2, 4],
            vec![3, 3],
        ];
        index.rewire(&table).unwrap();
        let graph = index.graph();
        assert_eq!(graph[0], vec![1, 2]);
        assert_eq!(graph[1], vec![0]);
        assert!(graph[2].is_empty());
        assert_eq!(graph[3], vec![2, 4]);
        assert_eq!(graph[4], vec![3]);

        assert!(matches!(
            index.rewire(&vec![vec![9]; 5]),
            Err(IndexError::InvalidArgument(_))
        ));
        assert!(matches!(
            index.rewire(&vec![vec![]; 2]),
            Err(IndexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_reprune_applies_selection() {
        let mut index = GraphIndex::<u32>::new(Arc::new(L2Space::new(1)), 4, 3).unwrap();
        for (i, x) in [0.0f32, 1.0, 1.1, -5.0].iter().enumerate() {
            index.add(bytes(&[*x]), i as u32, 10).unwrap();
        }
        index.rewire(&vec![vec![1, 2, 3], vec![], vec![], vec![]]).unwrap();
        assert_eq!(index.graph()[0].len(), 3);

        // 2 is reachable through 1, 3 lies on the other side
        index.reprune(0).unwrap();
        let mut row = index.graph()[0].clone();
        row.sort();
        assert_eq!(row, vec![1, 3]);

        assert!(index.reprune(9).is_err());
    }

    #[test]
    fn test_add_batch() {
        let vectors = random_vectors(20, 11);
        let flat: Vec<f32> = vectors.concat();
        let mut index = GraphIndex::<u32>::new(Arc::new(L2Space::new(DIM)), 32, 4).unwrap();
        assert_eq!(index.add_batch_auto(bytemuck::cast_slice(&flat), 20).unwrap(), 20);
        assert_eq!(index.node_label(19), Some(19));

        let labels = [100u32, 101];
        let two: Vec<f32> = vectors[..2].concat();
        index.add_batch(bytemuck::cast_slice(&two), &labels, 20).unwrap();
        assert_eq!(index.size(), 22);
        assert_eq!(index.node_label(21), Some(101));

        let err = index
            .add_batch(bytemuck::cast_slice(&two), &labels[..1], 20)
            .unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_custom_label_type() {
        let mut index = GraphIndex::<[u16; 3]>::new(Arc::new(L2Space::new(2)), 4, 2).unwrap();
        index.add(bytes(&[0.0, 0.0]), [1, 2, 3], 10).unwrap();
        index.add(bytes(&[5.0, 5.0]), [4, 5, 6], 10).unwrap();
        let results = index.search(bytes(&[4.0, 4.0]), 1, 10).unwrap();
        assert_eq!(results[0].1, [4, 5, 6]);
    }

    #[test]
    fn test_stats() {
        let (index, _) = build(30, 4);
        let stats = index.stats();
        assert_eq!(stats.node_count, 30);
        assert_eq!(stats.max_nodes, 30);
        assert!(stats.max_out_degree <= 4);
        assert!(stats.total_edges > 0);
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(GraphIndex::<u32>::new(Arc::new(L2Space::new(2)), 4, 0).is_err());
        assert!(GraphIndex::<u32>::new(Arc::new(L2Space::new(0)), 4, 2).is_err());
    }
}
