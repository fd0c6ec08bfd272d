pub mod trajectory;

pub use trajectory::render_trajectories;
