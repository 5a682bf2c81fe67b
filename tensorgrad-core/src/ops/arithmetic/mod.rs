// Foundational elementwise arithmetic
pub mod add;
pub mod mul;
pub mod neg;
pub mod sub;

pub use add::{add_op, Add};
pub use mul::{mul_op, Multiply};
pub use neg::{neg_op, Negate};
pub use sub::sub_op;
