use crate::{roles::Role, SecurityContext, SecurityError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    PaymentConfigValidate,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::PaymentConfigValidate => "payment_config_validate",
        }
    }
}

// Which roles are allowed each capability.
fn allowed_roles(cap: Capability) -> &'static [Role] {
    use Role::*;
    match cap {
        Capability::PaymentConfigValidate => &[SuperAdmin, Admin],
    }
}

pub fn ensure_capability(ctx: &SecurityContext, cap: Capability) -> Result<(), SecurityError> {
    crate::roles::ensure_any_role(ctx, allowed_roles(cap))
}
