// file: src/pipeline/budget.rs
// description: model call budget with fixed reservation for spec extraction and synthesis
// reference: planning-time accounting of completion calls

use crate::error::{PipelineError, Result};

/// One call for spec extraction, one for the final report.
pub const RESERVED_CALLS: usize = 2;

#[derive(Debug, Clone)]
pub struct CallBudget {
    max_calls: usize,
    reserved_for_documents: usize,
}

impl CallBudget {
    pub fn new(max_calls: usize) -> Result<Self> {
        if max_calls < RESERVED_CALLS {
            return Err(PipelineError::Validation(format!(
                "max_model_calls must be at least {} (spec extraction + final report), got {}",
                RESERVED_CALLS, max_calls
            )));
        }

        Ok(Self {
            max_calls,
            reserved_for_documents: 0,
        })
    }

    pub fn max_calls(&self) -> usize {
        self.max_calls
    }

    /// Calls available for document summaries in total.
    pub fn document_calls(&self) -> usize {
        self.max_calls - RESERVED_CALLS
    }

    pub fn remaining_document_calls(&self) -> usize {
        self.document_calls() - self.reserved_for_documents
    }

    pub fn try_reserve(&mut self, calls: usize) -> bool {
        if calls > self.remaining_document_calls() {
            return false;
        }
        self.reserved_for_documents += calls;
        true
    }

    pub fn reserved(&self) -> usize {
        self.reserved_for_documents
    }
}
