//! Step label construction.
//!
//! A step label is a dotted path of components such as `8.2.1` or `A.3`.
//! Every label exists in two spellings: the human one, and a sortable one in
//! which numeric components are zero-padded (`0008.0002.0001`) so plain string
//! comparison follows step order. Letter components are never padded.

/// The dotted prefix shared by all steps of one branch, in both spellings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StepPrefix {
    width: usize,
    human: String,
    sorted: String,
}

impl StepPrefix {
    /// The empty prefix used by the main path.
    pub(crate) const fn root(width: usize) -> Self {
        Self {
            width,
            human: String::new(),
            sorted: String::new(),
        }
    }

    /// Extend with a numeric component: `8.` / `0008.`.
    pub(crate) fn number(&self, n: usize) -> Self {
        let mut next = self.clone();
        next.human.push_str(&format!("{n}."));
        next.sorted.push_str(&format!("{n:0width$}.", width = self.width));
        next
    }

    /// Extend with the `index`-th letter component: `A.`, …, `Z.`, `AA.`.
    pub(crate) fn letter(&self, index: usize) -> Self {
        let letters = branch_letters(index);
        let mut next = self.clone();
        next.human.push_str(&letters);
        next.human.push('.');
        next.sorted.push_str(&letters);
        next.sorted.push('.');
        next
    }

    /// `(step, sorted_step)` for the step at `offset` under this prefix.
    pub(crate) fn label(&self, offset: usize) -> (String, String) {
        (
            format!("{}{offset}", self.human),
            format!("{}{offset:0width$}", self.sorted, width = self.width),
        )
    }
}

/// Padding width wide enough for any numeric component among `nodes` steps,
/// never narrower than `configured`.
pub(crate) fn padding_width(configured: usize, nodes: usize) -> usize {
    configured.max(nodes.to_string().len())
}

/// Spreadsheet-style column letters: 0 → `A`, 25 → `Z`, 26 → `AA`.
fn branch_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + u8::try_from(rem).unwrap_or(0));
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
