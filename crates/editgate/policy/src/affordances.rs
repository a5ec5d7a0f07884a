//! Editor affordances
//!
//! Which editing controls the host should offer an actor for an item. The
//! host renders them; only the selection is made here.

use editgate_types::EditingMode;
use serde::{Deserialize, Serialize};

/// Label of the primary submit control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitLabel {
    /// Host default ("Update")
    Default,

    /// The save will be a suggestion
    SuggestEdit,
}

/// Controls available to an actor on the edit screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorAffordances {
    /// Effective mode of the item
    pub mode: EditingMode,

    /// Actor may approve changes to this item
    pub can_approve: bool,

    /// The item's content type has the policy enabled
    pub type_enabled: bool,

    /// Approvers of published items may submit a suggestion instead of publishing
    pub offer_save_as_pending: bool,

    /// Wording of the primary submit control
    pub submit_label: SubmitLabel,

    /// Approvers may change the item's mode
    pub show_mode_selector: bool,

    /// Modes offered by the selector
    pub selectable_modes: Vec<EditingMode>,

    /// Saving is impossible for this actor
    pub hide_publish_actions: bool,
}

impl EditorAffordances {
    pub fn derive(mode: EditingMode, type_enabled: bool, can_approve: bool, published: bool) -> Self {
        let submit_label =
            if published && mode == EditingMode::ApprovalRequired && !can_approve {
                SubmitLabel::SuggestEdit
            } else {
                SubmitLabel::Default
            };
        let show_mode_selector = can_approve && type_enabled;

        Self {
            mode,
            can_approve,
            type_enabled,
            offer_save_as_pending: published && type_enabled && can_approve,
            submit_label,
            show_mode_selector,
            selectable_modes: if show_mode_selector {
                EditingMode::selectable().collect()
            } else {
                Vec::new()
            },
            hide_publish_actions: mode == EditingMode::Locked && !can_approve,
        }
    }
}
