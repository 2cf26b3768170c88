use typemut_ir::types::Value;

/// Verdict of running the target against one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The target returned normally. The payload is opaque to generation.
    Returned(serde_json::Value),
    /// The target exceeded its time budget.
    Timeout,
    /// The target raised, crashed or exited abnormally.
    Exception(String),
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Returned(_))
    }
}

/// Trait abstracting execution of the target program against a candidate.
///
/// Timeout enforcement belongs to the implementation; generation only
/// classifies the returned outcome.
pub trait Oracle {
    fn execute(&mut self, contract_code: &str, candidate: &Value, signature: &str) -> Outcome;
}

impl<F> Oracle for F
where
    F: FnMut(&str, &Value, &str) -> Outcome,
{
    fn execute(&mut self, contract_code: &str, candidate: &Value, signature: &str) -> Outcome {
        self(contract_code, candidate, signature)
    }
}

/// Oracle that accepts every candidate without running anything.
/// Used for dry runs and for testing the generation loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Oracle for AcceptAll {
    fn execute(&mut self, _contract_code: &str, _candidate: &Value, _signature: &str) -> Outcome {
        Outcome::Returned(serde_json::Value::Null)
    }
}
