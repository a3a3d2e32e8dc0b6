use crate::error::ReportResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Narrative content shown for a report's primary type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDetail {
    #[serde(rename = "type")]
    pub type_name: String,
    pub title: String,
    pub motto: String,
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    pub advantage: String,
    pub behavior: String,
    pub risk: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    #[serde(rename = "type")]
    pub type_name: String,
    pub definition: String,
}

/// Visual settings shared by every report in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseConfig {
    pub banner: String,
    pub logo: String,
    pub principles: Vec<String>,
    pub type_definitions: Vec<TypeDefinition>,
    pub appendix_text: String,
    pub qr_code: String,
}

impl Default for BaseConfig {
    fn default() -> Self {
        let definitions = [
            ("劳模型", "事必躬亲，以个人投入替代团队产出"),
            ("好人型", "重视关系和谐，回避冲突与要求"),
            ("严师型", "标准高、要求严，关注纠错多于激励"),
            ("遥控型", "远距离指挥，依赖指令而少有陪伴"),
            ("隐身型", "存在感弱，团队缺少方向与反馈"),
            ("黄牛型", "任劳任怨地承接任务，较少向上争取"),
            ("军师型", "善于出谋划策，落地推动相对不足"),
            ("内敛型", "沉稳克制，想法与情绪较少外显"),
        ];

        Self {
            banner: "/banner.png".to_string(),
            logo: "/logo.png".to_string(),
            principles: vec![
                "报告描述的是当前的管理习惯，而非能力高低".to_string(),
                "关注得分之间的相对关系，而非单个分数".to_string(),
                "结合真实工作场景理解结果，觉察即改变".to_string(),
            ],
            type_definitions: definitions
                .iter()
                .map(|(t, d)| TypeDefinition {
                    type_name: t.to_string(),
                    definition: d.to_string(),
                })
                .collect(),
            appendix_text: "如需进一步解读报告，请扫描二维码联系测评顾问。".to_string(),
            qr_code: "/qrcode.png".to_string(),
        }
    }
}

/// Type-detail lookup keyed by type label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeCatalogue {
    entries: HashMap<String, TypeDetail>,
}

impl TypeCatalogue {
    pub fn new(entries: HashMap<String, TypeDetail>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::new(HashMap::new())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeDetail> {
        self.entries.get(type_name)
    }

    pub fn insert(&mut self, detail: TypeDetail) {
        self.entries.insert(detail.type_name.clone(), detail);
    }

    pub fn remove(&mut self, type_name: &str) -> Option<TypeDetail> {
        self.entries.remove(type_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> HashMap<String, TypeDetail> {
        self.entries
    }
}

impl Default for TypeCatalogue {
    fn default() -> Self {
        let texts: [(&str, &str, &str); 8] = [
            ("劳模型", "冲在一线的劳模", "我多做一点，团队就少出一点错"),
            ("好人型", "温和体贴的好人", "大家开心，事情自然会好"),
            ("严师型", "标准严格的严师", "严是爱，松是害"),
            ("遥控型", "运筹帷幄的遥控者", "方向给到位，过程看结果"),
            ("隐身型", "安静低调的隐身者", "不打扰，就是最好的支持"),
            ("黄牛型", "埋头苦干的黄牛", "交给我的事，一定扛下来"),
            ("军师型", "足智多谋的军师", "先想清楚，再出手"),
            ("内敛型", "沉稳克制的内敛者", "少说多想，水到渠成"),
        ];

        let entries = texts
            .iter()
            .map(|(t, title, motto)| {
                let detail = TypeDetail {
                    type_name: t.to_string(),
                    title: format!("{}：{}", t, title),
                    motto: motto.to_string(),
                    avatar: format!("/avatars/{}.png", t),
                    qr_code: None,
                    advantage: format!("{}管理者的初衷是对结果负责。\n这种投入让团队在关键时刻有依靠。", t),
                    behavior: format!("在压力下更容易回到{}的惯常做法。", t),
                    risk: "过度依赖单一管理方式，团队成长空间受限。".to_string(),
                    suggestion: "有意识地识别场景，在不同情境下切换管理方式。\n每周复盘一次自己的管理动作。".to_string(),
                };
                (t.to_string(), detail)
            })
            .collect();

        Self { entries }
    }
}

/// Shared settings as exchanged with the config service and settings files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedSettings {
    #[serde(default)]
    pub base_config: Option<BaseConfig>,
    #[serde(default)]
    pub management_configs: Option<HashMap<String, TypeDetail>>,
}

impl SharedSettings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
