use crate::{field::FieldValue, grid::Grid};

/// Implicitly diffuses `prev` over one timestep into `out`.
///
/// Runs `num_iters` Jacobi sweeps of `(prev + a * neighbours) / (1 + 6a)` with
/// `a = dt * rate * N`, starting from `prev` itself. `scratch` holds the sweep being written and
/// is resized as needed.
pub fn diffuse<T: FieldValue>(
    grid: &Grid,
    out: &mut Vec<T>,
    scratch: &mut Vec<T>,
    prev: &[T],
    dt: f32,
    rate: f32,
    num_iters: usize,
) {
    let a = dt * rate * grid.len() as f32;
    let div = 1.0 + 6.0 * a;

    out.clear();
    out.extend_from_slice(prev);
    scratch.clear();
    scratch.extend_from_slice(prev);

    for _iter in 0..num_iters {
        for (idx, c) in grid.cells() {
            let neighbor_sum = grid.neighbor_sum(out, c);
            scratch[idx] = (prev[idx] + neighbor_sum * a) / div;
        }

        std::mem::swap(out, scratch);
    }
}
