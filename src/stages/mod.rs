pub mod stage0_segment;
pub mod stage1_llm_screen;
pub mod stage2_reconcile;
pub mod stage3_render;

pub use stage0_segment::*;
pub use stage1_llm_screen::*;
pub use stage2_reconcile::*;
pub use stage3_render::*;
