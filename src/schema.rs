use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

pub const NAME_FIELD: &str = "姓名";
pub const DATE_FIELD: &str = "日期";

/// The 14 scored columns of an assessment row, in sheet order.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScoreField {
    // Capability (outer ring)
    #[strum(serialize = "想明白")]
    ThinkClearly,
    #[strum(serialize = "讲清楚")]
    SpeakClearly,
    #[strum(serialize = "执行到位")]
    Execute,

    // Management focus (inner ring)
    #[strum(serialize = "管自己")]
    ManageSelf,
    #[strum(serialize = "管业务")]
    ManageBusiness,
    #[strum(serialize = "管团队")]
    ManageTeam,

    // Management types
    #[strum(serialize = "劳模型")]
    ModelWorker,
    #[strum(serialize = "好人型")]
    NiceGuy,
    #[strum(serialize = "严师型")]
    StrictMentor,
    #[strum(serialize = "遥控型")]
    RemoteControl,
    #[strum(serialize = "隐身型")]
    Invisible,
    #[strum(serialize = "黄牛型")]
    Workhorse,
    #[strum(serialize = "军师型")]
    Strategist,
    #[strum(serialize = "内敛型")]
    Reserved,
}

pub const CAPABILITY_FIELDS: [ScoreField; 3] = [
    ScoreField::ThinkClearly,
    ScoreField::SpeakClearly,
    ScoreField::Execute,
];

pub const FOCUS_FIELDS: [ScoreField; 3] = [
    ScoreField::ManageSelf,
    ScoreField::ManageBusiness,
    ScoreField::ManageTeam,
];

/// Canonical type ordering. Primary-type ties resolve to the earliest entry.
pub const TYPE_FIELDS: [ScoreField; 8] = [
    ScoreField::ModelWorker,
    ScoreField::NiceGuy,
    ScoreField::StrictMentor,
    ScoreField::RemoteControl,
    ScoreField::Invisible,
    ScoreField::Workhorse,
    ScoreField::Strategist,
    ScoreField::Reserved,
];

impl ScoreField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ThinkClearly => "想明白",
            Self::SpeakClearly => "讲清楚",
            Self::Execute => "执行到位",
            Self::ManageSelf => "管自己",
            Self::ManageBusiness => "管业务",
            Self::ManageTeam => "管团队",
            Self::ModelWorker => "劳模型",
            Self::NiceGuy => "好人型",
            Self::StrictMentor => "严师型",
            Self::RemoteControl => "遥控型",
            Self::Invisible => "隐身型",
            Self::Workhorse => "黄牛型",
            Self::Strategist => "军师型",
            Self::Reserved => "内敛型",
        }
    }

    pub fn is_type(&self) -> bool {
        TYPE_FIELDS.contains(self)
    }
}

/// All 16 column names a row must carry.
pub fn required_fields() -> Vec<&'static str> {
    let mut fields = vec![NAME_FIELD, DATE_FIELD];
    fields.extend(ScoreField::iter().map(|f| f.label()));
    fields
}

/// The 8 type labels in canonical order.
pub fn type_labels() -> Vec<&'static str> {
    TYPE_FIELDS.iter().map(|f| f.label()).collect()
}
