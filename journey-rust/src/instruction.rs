/// One line of a system prompt. Either fixed text or rendered from the
/// request context.
#[derive(Debug, Clone)]
pub enum InstructionParam<TCtx> {
    String(String),
    Func(fn(&TCtx) -> String),
}

impl<TCtx> InstructionParam<TCtx> {
    pub fn as_string(&self, context: &TCtx) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Func(f) => f(context),
        }
    }
}

impl<TCtx> From<&str> for InstructionParam<TCtx> {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<TCtx> From<String> for InstructionParam<TCtx> {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl<TCtx> From<fn(&TCtx) -> String> for InstructionParam<TCtx> {
    fn from(value: fn(&TCtx) -> String) -> Self {
        Self::Func(value)
    }
}

pub fn get_prompt<TCtx>(instructions: &[InstructionParam<TCtx>], context: &TCtx) -> String {
    instructions
        .iter()
        .map(|param| param.as_string(context))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        theme: &'static str,
    }

    #[test]
    fn joins_static_and_rendered_lines() {
        let instructions: Vec<InstructionParam<Ctx>> = vec![
            "You write letters.".into(),
            InstructionParam::Func(|ctx| format!("Theme: {}", ctx.theme)),
        ];
        assert_eq!(
            get_prompt(&instructions, &Ctx { theme: "Maple Red" }),
            "You write letters.\nTheme: Maple Red"
        );
    }
}
