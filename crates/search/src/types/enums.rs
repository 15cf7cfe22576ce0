//! Enumerated property code tables.
//!
//! Features, stages and gates store enumerated properties as integer codes.
//! Queries may name a value either by its code or by its display name; the
//! display-name lookup ignores case and punctuation so that
//! `category="Web Components"`, `category=webcomponents` and `category=0`
//! all select the same records.

// Code constants and enum variants are named after what they encode
#![allow(missing_docs)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Feature category codes.
pub mod category {
    pub const WEB_COMPONENTS: i64 = 0;
    pub const MISC: i64 = 1;
    pub const SECURITY: i64 = 2;
    pub const MULTIMEDIA: i64 = 3;
    pub const DOM: i64 = 4;
    pub const FILE: i64 = 5;
    pub const OFFLINE: i64 = 6;
    pub const DEVICE: i64 = 7;
    pub const COMMUNICATION: i64 = 8;
    pub const JAVASCRIPT: i64 = 9;
    pub const NETWORKING: i64 = 10;
    pub const INPUT: i64 = 11;
    pub const PERFORMANCE: i64 = 12;
    pub const GRAPHICS: i64 = 13;
    pub const CSS: i64 = 14;
    pub const HOUSEKEEPING: i64 = 15;
    pub const SERVICE_WORKER: i64 = 16;
    pub const WEBRTC: i64 = 17;
    pub const LAYERED: i64 = 18;
    pub const WEBASSEMBLY: i64 = 19;
    pub const CAPABILITIES: i64 = 20;
}

/// Feature type codes.
pub mod feature_type {
    pub const INCUBATE: i64 = 0;
    pub const EXISTING: i64 = 1;
    pub const CODE_CHANGE: i64 = 2;
    pub const DEPRECATION: i64 = 3;
    pub const ENTERPRISE: i64 = 4;
}

/// Stage type codes, grouped by the feature type that uses them.
pub mod stage_type {
    pub const INCUBATE: i64 = 110;
    pub const PROTOTYPE: i64 = 120;
    pub const DEV_TRIAL: i64 = 130;
    pub const EVAL_READINESS: i64 = 140;
    pub const ORIGIN_TRIAL: i64 = 150;
    pub const EXTEND_ORIGIN_TRIAL: i64 = 151;
    pub const SHIPPING: i64 = 160;

    pub const FF_PROTOTYPE: i64 = 220;
    pub const FF_DEV_TRIAL: i64 = 230;
    pub const FF_ORIGIN_TRIAL: i64 = 250;
    pub const FF_EXTEND_ORIGIN_TRIAL: i64 = 251;
    pub const FF_SHIPPING: i64 = 260;

    pub const CC_DEV_TRIAL: i64 = 330;
    pub const CC_SHIPPING: i64 = 360;

    pub const DEP_DEV_TRIAL: i64 = 430;
    pub const DEP_DEPRECATION_TRIAL: i64 = 450;
    pub const DEP_EXTEND_DEPRECATION_TRIAL: i64 = 451;
    pub const DEP_SHIPPING: i64 = 460;

    pub const ENTERPRISE_ROLLOUT: i64 = 1061;

    /// Stages that ship a feature to stable.
    pub const SHIPPING_STAGES: &[i64] = &[SHIPPING, FF_SHIPPING, CC_SHIPPING, DEP_SHIPPING];
    /// Origin-trial-like stages (including deprecation trials).
    pub const ORIGIN_TRIAL_STAGES: &[i64] = &[ORIGIN_TRIAL, FF_ORIGIN_TRIAL, DEP_DEPRECATION_TRIAL];
    /// Developer trial stages.
    pub const DEV_TRIAL_STAGES: &[i64] = &[DEV_TRIAL, FF_DEV_TRIAL, CC_DEV_TRIAL, DEP_DEV_TRIAL];
    /// Enterprise rollout stages.
    pub const ROLLOUT_STAGES: &[i64] = &[ENTERPRISE_ROLLOUT];
}

/// Review gate state codes.
pub mod gate_state {
    pub const PREPARING: i64 = 0;
    pub const NA: i64 = 1;
    pub const REVIEW_REQUESTED: i64 = 2;
    pub const REVIEW_STARTED: i64 = 3;
    pub const NEEDS_WORK: i64 = 4;
    pub const APPROVED: i64 = 5;
    pub const DENIED: i64 = 6;
    pub const NO_RESPONSE: i64 = 7;
    pub const INTERNAL_REVIEW: i64 = 8;
    pub const NA_REQUESTED: i64 = 9;

    /// States in which a gate is waiting on a reviewer.
    pub const PENDING_STATES: &[i64] = &[
        REVIEW_REQUESTED,
        REVIEW_STARTED,
        NEEDS_WORK,
        INTERNAL_REVIEW,
        NA_REQUESTED,
    ];
    /// States that record a final review decision.
    pub const FINAL_STATES: &[i64] = &[NA, APPROVED, DENIED];
}

/// Review gate type codes.
pub mod gate_type {
    pub const API_PROTOTYPE: i64 = 1;
    pub const API_ORIGIN_TRIAL: i64 = 2;
    pub const API_EXTEND_ORIGIN_TRIAL: i64 = 3;
    pub const API_SHIP: i64 = 4;
    pub const PRIVACY_ORIGIN_TRIAL: i64 = 32;
    pub const PRIVACY_SHIP: i64 = 34;
    pub const SECURITY_ORIGIN_TRIAL: i64 = 42;
    pub const SECURITY_SHIP: i64 = 44;
    pub const ENTERPRISE_SHIP: i64 = 54;
    pub const DEBUGGABILITY_SHIP: i64 = 64;
    pub const TESTING_SHIP: i64 = 74;
}

const CATEGORY_NAMES: &[(i64, &str)] = &[
    (category::WEB_COMPONENTS, "Web Components"),
    (category::MISC, "Miscellaneous"),
    (category::SECURITY, "Security"),
    (category::MULTIMEDIA, "Multimedia"),
    (category::DOM, "DOM"),
    (category::FILE, "File APIs"),
    (category::OFFLINE, "Offline / Storage"),
    (category::DEVICE, "Device"),
    (category::COMMUNICATION, "Realtime / Communication"),
    (category::JAVASCRIPT, "JavaScript"),
    (category::NETWORKING, "Network / Connectivity"),
    (category::INPUT, "User input"),
    (category::PERFORMANCE, "Performance"),
    (category::GRAPHICS, "Graphics"),
    (category::CSS, "CSS"),
    (category::HOUSEKEEPING, "Housekeeping"),
    (category::SERVICE_WORKER, "Service Worker"),
    (category::WEBRTC, "WebRTC"),
    (category::LAYERED, "Layered APIs"),
    (category::WEBASSEMBLY, "WebAssembly"),
    (category::CAPABILITIES, "Capabilities (Fugu)"),
];

const FEATURE_TYPE_NAMES: &[(i64, &str)] = &[
    (feature_type::INCUBATE, "New feature incubation"),
    (feature_type::EXISTING, "Existing feature implementation"),
    (feature_type::CODE_CHANGE, "Web developer facing change to existing code"),
    (feature_type::DEPRECATION, "Feature deprecation"),
    (feature_type::ENTERPRISE, "Chrome enterprise feature"),
];

const IMPL_STATUS_NAMES: &[(i64, &str)] = &[
    (1, "No active development"),
    (2, "Proposed"),
    (3, "In development"),
    (4, "In developer trial (Behind a flag)"),
    (5, "Enabled by default"),
    (6, "Deprecated"),
    (7, "Removed"),
    (8, "Origin trial"),
    (9, "Browser Intervention"),
    (10, "On hold"),
    (1000, "No longer pursuing"),
];

const INTENT_STAGE_NAMES: &[(i64, &str)] = &[
    (0, "None"),
    (1, "Start incubating"),
    (2, "Start prototyping"),
    (3, "Dev trials"),
    (4, "Evaluate readiness to ship"),
    (5, "Origin Trial"),
    (6, "Prepare to ship"),
    (7, "Shipped"),
    (8, "Extend Origin Trial"),
    (9, "Ship"),
    (10, "Rollout"),
];

const STANDARD_MATURITY_NAMES: &[(i64, &str)] = &[
    (0, "Unset"),
    (1, "Unknown standards status"),
    (2, "Proposal"),
    (3, "Incubation"),
    (4, "Working draft or equivalent"),
    (5, "Specification"),
];

const STAGE_TYPE_NAMES: &[(i64, &str)] = &[
    (stage_type::INCUBATE, "Incubate"),
    (stage_type::PROTOTYPE, "Prototype"),
    (stage_type::DEV_TRIAL, "Dev trial"),
    (stage_type::EVAL_READINESS, "Evaluate readiness to ship"),
    (stage_type::ORIGIN_TRIAL, "Origin trial"),
    (stage_type::EXTEND_ORIGIN_TRIAL, "Extend origin trial"),
    (stage_type::SHIPPING, "Ship"),
    (stage_type::FF_PROTOTYPE, "Fast-follow prototype"),
    (stage_type::FF_DEV_TRIAL, "Fast-follow dev trial"),
    (stage_type::FF_ORIGIN_TRIAL, "Fast-follow origin trial"),
    (stage_type::FF_EXTEND_ORIGIN_TRIAL, "Fast-follow extend origin trial"),
    (stage_type::FF_SHIPPING, "Fast-follow ship"),
    (stage_type::CC_DEV_TRIAL, "Code change dev trial"),
    (stage_type::CC_SHIPPING, "Code change ship"),
    (stage_type::DEP_DEV_TRIAL, "Deprecation dev trial"),
    (stage_type::DEP_DEPRECATION_TRIAL, "Deprecation trial"),
    (stage_type::DEP_EXTEND_DEPRECATION_TRIAL, "Extend deprecation trial"),
    (stage_type::DEP_SHIPPING, "Deprecation ship"),
    (stage_type::ENTERPRISE_ROLLOUT, "Rollout"),
];

const GATE_TYPE_NAMES: &[(i64, &str)] = &[
    (gate_type::API_PROTOTYPE, "API Owners Prototype"),
    (gate_type::API_ORIGIN_TRIAL, "API Owners Origin Trial"),
    (gate_type::API_EXTEND_ORIGIN_TRIAL, "API Owners Extend Origin Trial"),
    (gate_type::API_SHIP, "API Owners Ship"),
    (gate_type::PRIVACY_ORIGIN_TRIAL, "Privacy Origin Trial"),
    (gate_type::PRIVACY_SHIP, "Privacy Ship"),
    (gate_type::SECURITY_ORIGIN_TRIAL, "Security Origin Trial"),
    (gate_type::SECURITY_SHIP, "Security Ship"),
    (gate_type::ENTERPRISE_SHIP, "Enterprise Ship"),
    (gate_type::DEBUGGABILITY_SHIP, "Debuggability Ship"),
    (gate_type::TESTING_SHIP, "Testing Ship"),
];

const GATE_STATE_NAMES: &[(i64, &str)] = &[
    (gate_state::PREPARING, "Preparing"),
    (gate_state::NA, "N/A"),
    (gate_state::REVIEW_REQUESTED, "Review requested"),
    (gate_state::REVIEW_STARTED, "Review started"),
    (gate_state::NEEDS_WORK, "Needs work"),
    (gate_state::APPROVED, "Approved"),
    (gate_state::DENIED, "Denied"),
    (gate_state::NO_RESPONSE, "No response"),
    (gate_state::INTERNAL_REVIEW, "Internal review"),
    (gate_state::NA_REQUESTED, "N/A requested"),
];

/// The enumerations a queryable property may be coded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumKind {
    Category,
    FeatureType,
    ImplStatus,
    IntentStage,
    StandardMaturity,
    StageType,
    GateType,
    GateState,
}

impl EnumKind {
    /// Every enumeration, for table validation.
    pub const ALL: &'static [EnumKind] = &[
        EnumKind::Category,
        EnumKind::FeatureType,
        EnumKind::ImplStatus,
        EnumKind::IntentStage,
        EnumKind::StandardMaturity,
        EnumKind::StageType,
        EnumKind::GateType,
        EnumKind::GateState,
    ];

    /// Returns the `(code, display name)` table for this enumeration.
    pub fn entries(self) -> &'static [(i64, &'static str)] {
        match self {
            EnumKind::Category => CATEGORY_NAMES,
            EnumKind::FeatureType => FEATURE_TYPE_NAMES,
            EnumKind::ImplStatus => IMPL_STATUS_NAMES,
            EnumKind::IntentStage => INTENT_STAGE_NAMES,
            EnumKind::StandardMaturity => STANDARD_MATURITY_NAMES,
            EnumKind::StageType => STAGE_TYPE_NAMES,
            EnumKind::GateType => GATE_TYPE_NAMES,
            EnumKind::GateState => GATE_STATE_NAMES,
        }
    }

    /// Looks up the code for a query literal.
    ///
    /// Accepts either a known integer code or a display name compared after
    /// [`normalize_enum_name`]. Returns `None` if nothing matches.
    pub fn lookup(self, literal: &str) -> Option<i64> {
        let entries = self.entries();
        if let Ok(code) = literal.trim().parse::<i64>() {
            return entries.iter().find(|(c, _)| *c == code).map(|(c, _)| *c);
        }

        let wanted = normalize_enum_name(literal);
        if wanted.is_empty() {
            return None;
        }
        entries
            .iter()
            .find(|(_, name)| normalize_enum_name(name) == wanted)
            .map(|(code, _)| *code)
    }

    /// Returns the display name for a code.
    pub fn display_name(self, code: i64) -> Option<&'static str> {
        self.entries()
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for EnumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumKind::Category => write!(f, "category"),
            EnumKind::FeatureType => write!(f, "feature_type"),
            EnumKind::ImplStatus => write!(f, "impl_status"),
            EnumKind::IntentStage => write!(f, "intent_stage"),
            EnumKind::StandardMaturity => write!(f, "standard_maturity"),
            EnumKind::StageType => write!(f, "stage_type"),
            EnumKind::GateType => write!(f, "gate_type"),
            EnumKind::GateState => write!(f, "gate_state"),
        }
    }
}

/// Lowercases a name and drops everything that is not a letter or digit.
pub fn normalize_enum_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
