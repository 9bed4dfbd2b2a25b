//! Writing a definition back out in the transition grammar.

use crate::core::Definition;

impl Definition {
    /// Render every transition as a `SOURCE -> DEST (LABEL);` line.
    ///
    /// Lines are sorted, so the output does not depend on insertion order.
    /// Comments, whitespace and hooks of the original input are not kept,
    /// and isolated states (no transitions in or out) do not appear.
    ///
    /// ```rust
    /// use labelled_fsm::core::Definition;
    ///
    /// let definition: Definition = "unlocked -> locked (push); locked -> unlocked (coin)"
    ///     .parse()
    ///     .unwrap();
    ///
    /// assert_eq!(
    ///     definition.definition_formats(),
    ///     "locked -> unlocked (coin);\nunlocked -> locked (push);"
    /// );
    /// ```
    pub fn definition_formats(&self) -> String {
        let mut lines: Vec<String> = self
            .states()
            .flat_map(|state| {
                state.transitions().map(move |transition| {
                    format!(
                        "{} -> {} ({});",
                        state.label(),
                        transition.destination(),
                        transition.label()
                    )
                })
            })
            .collect();
        lines.sort();
        lines.join("\n")
    }
}
