use crate::model::Model;
use crate::planner::tree::Tree;
use crate::state::Configuration;
use num_traits::Float;

/// A nearest neighbor query result: a vertex handle and its true distance
/// to the query configuration.
#[derive(Clone, Copy, Debug)]
pub struct Neighbor<F: Float> {
    pub vertex: usize,
    pub distance: F,
}

/// Finds the closest eligible vertex of `tree` to `target`.
///
/// A linear scan that compares the model's transformed distance directly and
/// converts the minimum back to the true distance before returning. Vertices
/// marked exhausted are skipped entirely. Ties keep the first vertex
/// encountered in iteration order.
///
/// Returns None if the tree has no eligible vertex.
pub fn nearest<F: Float, const N: usize, M: Model<F, N>>(
    tree: &Tree<F, N>,
    target: &Configuration<F, N>,
    model: &M,
) -> Option<Neighbor<F>> {
    let mut best: Option<(usize, F)> = None;

    for (index, vertex) in tree.vertices().iter().enumerate() {
        if vertex.is_exhausted() {
            continue;
        }
        let d = model.transformed_distance(target, vertex.config());
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((index, d)),
        }
    }

    best.map(|(vertex, transformed)| Neighbor {
        vertex,
        distance: model.inverse_of_transformed_distance(transformed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnalyticModel;
    use approx::assert_relative_eq;

    fn model() -> AnalyticModel<f64, 2> {
        AnalyticModel::new(
            Configuration::new([0.0, 0.0]),
            Configuration::new([10.0, 10.0]),
            Vec::new(),
        )
        .unwrap()
    }

    fn tree_with(configs: &[[f64; 2]]) -> Tree<f64, 2> {
        let mut tree = Tree::new();
        for (i, values) in configs.iter().enumerate() {
            let v = tree.add_vertex(Configuration::new(*values));
            if i > 0 {
                tree.add_edge(0, v);
            }
        }
        tree
    }

    #[test]
    fn returns_the_minimum_over_all_vertices() {
        let tree = tree_with(&[[0.0, 0.0], [4.5, 0.0], [2.5, 0.0]]);
        let model = model();
        let query = Configuration::new([3.0, 0.0]);

        let neighbor = nearest(&tree, &query, &model).unwrap();
        assert_eq!(neighbor.vertex, 2);
        for vertex in tree.vertices() {
            assert!(neighbor.distance <= model.distance(vertex.config(), &query));
        }
    }

    #[test]
    fn reports_the_true_distance_not_the_transformed_one() {
        let tree = tree_with(&[[0.0, 0.0]]);
        let neighbor = nearest(&tree, &Configuration::new([3.0, 4.0]), &model()).unwrap();
        assert_relative_eq!(neighbor.distance, 5.0);
    }

    #[test]
    fn skips_exhausted_vertices_while_an_eligible_one_exists() {
        let mut tree = tree_with(&[[0.0, 0.0], [3.0, 0.0], [8.0, 0.0]]);
        tree.mark_exhausted(1);
        let neighbor = nearest(&tree, &Configuration::new([3.0, 0.0]), &model()).unwrap();
        assert_eq!(neighbor.vertex, 0);
    }

    #[test]
    fn empty_or_fully_exhausted_trees_yield_none() {
        let model = model();
        let empty: Tree<f64, 2> = Tree::new();
        assert!(nearest(&empty, &Configuration::new([0.0, 0.0]), &model).is_none());

        let mut tree = tree_with(&[[1.0, 1.0]]);
        tree.mark_exhausted(0);
        assert!(nearest(&tree, &Configuration::new([0.0, 0.0]), &model).is_none());
    }

    #[test]
    fn ties_keep_the_first_vertex_in_iteration_order() {
        let tree = tree_with(&[[2.0, 0.0], [0.0, 2.0]]);
        let neighbor = nearest(&tree, &Configuration::new([1.0, 1.0]), &model()).unwrap();
        assert_eq!(neighbor.vertex, 0);
    }
}
