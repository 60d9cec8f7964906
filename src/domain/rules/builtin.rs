//! Built-in bilingual rule table (Chinese and English)

use super::{ContextRequirements, MatchRuleDef, PatternLists};
use crate::domain::value_objects::ScenarioType;

fn list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

struct Patterns<'a> {
    exact: &'a [&'a str],
    prefix: &'a [&'a str],
    suffix: &'a [&'a str],
    contains: &'a [&'a str],
    regex: &'a [&'a str],
}

impl From<Patterns<'_>> for PatternLists {
    fn from(p: Patterns<'_>) -> Self {
        Self {
            exact: list(p.exact),
            prefix: list(p.prefix),
            suffix: list(p.suffix),
            contains: list(p.contains),
            regex: list(p.regex),
        }
    }
}

fn rule(
    scenario: ScenarioType,
    base_confidence: f64,
    programmatic_calculable: bool,
    patterns: Patterns<'_>,
    location: &[&str],
    objects: &[&str],
    player_state: &[&str],
) -> MatchRuleDef {
    MatchRuleDef {
        scenario,
        patterns: patterns.into(),
        context_requirements: ContextRequirements {
            location: list(location),
            objects: list(objects),
            player_state: list(player_state),
        },
        base_confidence,
        programmatic_calculable,
    }
}

/// The default rule table, one rule per scenario
pub fn builtin_rules() -> Vec<MatchRuleDef> {
    vec![
        rule(
            ScenarioType::Combat,
            0.95,
            true,
            Patterns {
                exact: &["攻击", "战斗", "决斗", "厮杀", "交手", "对战", "attack", "fight", "duel", "battle"],
                prefix: &["攻击", "击败", "打败", "杀死", "斩杀", "attack", "strike", "kill", "slay", "defeat"],
                suffix: &["攻击", "挑战", "决斗", "to a duel"],
                contains: &["vs", "对战", "切磋", "比武", "spar with", "clash with"],
                regex: &[
                    r"攻击.+",
                    r"与.+战斗",
                    r"挑战.+",
                    r"向.+发起",
                    r"(?i)^attack\s+.+",
                    r"(?i)\bfight\s+(with|against)\s+.+",
                    r"(?i)\bchallenge\s+.+\s+to\s+(a\s+)?(duel|fight)",
                ],
            },
            &[],
            &["敌人", "对手", "魔修", "妖兽", "武器", "enemy", "opponent", "cultist", "demon", "sword", "weapon"],
            &[],
        ),
        rule(
            ScenarioType::Breakthrough,
            0.98,
            true,
            Patterns {
                exact: &["突破", "进阶", "晋级", "冲关", "渡劫", "break through", "breakthrough", "ascend", "tribulation"],
                prefix: &["突破到", "冲击", "尝试突破", "break through", "try to break through", "attempt to break through"],
                suffix: &["突破", "进阶", "境界", "realm", "bottleneck"],
                contains: &["结丹", "凝婴", "化神", "合体", "next realm", "next stage", "golden core", "nascent soul"],
                regex: &[
                    r"突破.+境",
                    r"冲击.+级",
                    r"进阶.+期",
                    r"(?i)break\s*through.*(realm|stage|bottleneck)",
                ],
            },
            &[],
            &[],
            &["修为圆满", "瓶颈", "准备突破", "bottleneck", "ready to break through"],
        ),
        rule(
            ScenarioType::Cultivation,
            0.92,
            true,
            Patterns {
                exact: &["修炼", "练功", "打坐", "冥想", "运功", "吐纳", "cultivate", "meditate", "circulate qi"],
                prefix: &["修炼", "练习", "参悟", "cultivate", "meditate", "practice", "comprehend"],
                suffix: &["功法", "心法", "诀", "technique", "manual", "sutra"],
                contains: &["炼化", "感悟", "领悟", "spiritual qi", "insight", "closed-door"],
                regex: &[
                    r"修炼.+",
                    r"练习.+功",
                    r"参悟.+",
                    r"闭关.+",
                    r"(?i)^(cultivate|practice)\s+.+",
                    r"(?i)\bgo\s+into\s+seclusion\b",
                ],
            },
            &["洞府", "静室", "练功房", "cave abode", "meditation chamber"],
            &[],
            &[],
        ),
        rule(
            ScenarioType::Alchemy,
            0.96,
            true,
            Patterns {
                exact: &["炼丹", "炼药", "制丹", "熬药", "配药", "alchemy", "refine pills", "brew a pill"],
                prefix: &["炼制", "制作", "refine", "brew", "concoct"],
                suffix: &["丹", "药", "丹药", "elixir"],
                contains: &["丹炉", "药材", "丹方", "pill furnace", "cauldron", "herbs", "pill recipe"],
                regex: &[
                    r"炼制.+丹",
                    r"制作.+药",
                    r"炼.+丹药",
                    r"(?i)\b(refine|brew|concoct)\s+.*(pill|elixir)",
                ],
            },
            &["丹房", "alchemy room"],
            &["丹炉", "药材", "火种", "furnace", "herb", "cauldron"],
            &[],
        ),
        rule(
            ScenarioType::Crafting,
            0.94,
            true,
            Patterns {
                exact: &["炼器", "锻造", "打造", "铸造", "forge", "craft", "smith"],
                prefix: &["炼制", "锻造", "打造", "forge", "craft", "smith"],
                suffix: &["器", "剑", "刀", "法器", "artifact", "armor", "blade"],
                contains: &["材料", "炉火", "锤子", "materials", "anvil", "hammer"],
                regex: &[
                    r"炼制.+器",
                    r"打造.+",
                    r"锻造.+",
                    r"(?i)\b(forge|craft|refine)\s+.*(artifact|sword|blade|armor|weapon)",
                ],
            },
            &["炼器室", "forge"],
            &["炉火", "材料", "工具", "anvil", "hammer", "ore"],
            &[],
        ),
        rule(
            ScenarioType::Social,
            0.88,
            false,
            Patterns {
                exact: &["表白", "告白", "求爱", "调戏", "聊天", "交谈", "confess", "flirt", "chat with", "converse"],
                prefix: &["向", "对", "和", "talk to", "speak with", "speak to", "ask ", "tell ", "greet"],
                suffix: &["说话", "表白", "聊天", "a compliment"],
                contains: &["师姐", "师妹", "美女", "佳人", "senior sister", "junior sister", "fairy"],
                regex: &[
                    r"对.+说",
                    r"向.+表达",
                    r"和.+聊天",
                    r"追求.+",
                    r"(?i)^(talk|speak|chat)\s+(to|with)\s+.+",
                    r"(?i)^ask\s+.+\s+(about|whether|if)\s+.+",
                ],
            },
            &[],
            &["师姐", "师妹", "女修", "美女", "senior sister", "junior sister", "elder"],
            &[],
        ),
        rule(
            ScenarioType::Exploration,
            0.75,
            false,
            Patterns {
                exact: &["探索", "搜索", "寻找", "查看", "调查", "前往", "进入", "explore", "search", "investigate", "look around"],
                prefix: &["前往", "进入", "探索", "寻找", "explore", "search", "enter", "go to", "head to", "travel to", "look for"],
                suffix: &["地方", "洞穴", "遗迹", "cave", "ruins"],
                contains: &["秘境", "宝藏", "洞穴", "遗迹", "secret realm", "treasure", "hidden path"],
                regex: &[
                    r"前往.+",
                    r"探索.+",
                    r"寻找.+",
                    r"进入.+",
                    r"(?i)^(explore|search|enter|investigate)\s+.+",
                ],
            },
            &[],
            &[],
            &[],
        ),
        rule(
            ScenarioType::FormationBreaking,
            0.91,
            true,
            Patterns {
                exact: &["破阵", "解阵", "破解阵法", "破坏阵法", "break the formation", "dispel the array"],
                prefix: &["破解", "解开", "破坏", "dispel", "disable", "crack"],
                suffix: &["阵", "阵法", "禁制", "formation", "array", "ward"],
                contains: &["阵眼", "阵纹", "机关", "array eye", "formation eye", "restriction"],
                regex: &[
                    r"破解.+阵",
                    r"解开.+",
                    r"破坏.+阵法",
                    r"(?i)\b(break|crack|dispel|disable)\s+.*(formation|array|ward|restriction)",
                ],
            },
            &[],
            &["阵法", "禁制", "机关", "阵眼", "formation", "array", "ward"],
            &[],
        ),
        rule(
            ScenarioType::PillConsumption,
            0.93,
            true,
            Patterns {
                exact: &["服用", "吃药", "服药", "炼化", "swallow", "take the pill", "consume the pill"],
                prefix: &["服用", "吃", "炼化", "swallow", "consume", "take a", "eat"],
                suffix: &["丹", "药", "丹药", "pill", "elixir"],
                contains: &["药力", "药效", "medicinal power", "pill's effect"],
                regex: &[
                    r"服用.+丹",
                    r"吃.+药",
                    r"炼化.+",
                    r"(?i)\b(swallow|consume|take|eat)\s+.*(pill|elixir)",
                ],
            },
            &[],
            &["丹药", "灵丹", "药物", "pill", "elixir"],
            &[],
        ),
        rule(
            ScenarioType::Negotiation,
            0.8,
            false,
            Patterns {
                exact: &["谈判", "讨价还价", "交易", "议价", "negotiate", "bargain", "haggle"],
                prefix: &["讨价", "交换", "谈判", "negotiate", "bargain", "haggle", "offer"],
                suffix: &["价格", "条件", "price", "deal", "terms"],
                contains: &["灵石", "报酬", "spirit stones", "discount", "payment"],
                regex: &[
                    r"用.+换.+",
                    r"和.+谈判",
                    r"(?i)\b(trade|exchange)\s+.+\s+for\s+.+",
                ],
            },
            &["坊市", "商铺", "market", "shop"],
            &["商人", "掌柜", "merchant", "trader", "shopkeeper"],
            &[],
        ),
        rule(
            ScenarioType::BeastTaming,
            0.9,
            false,
            Patterns {
                exact: &["驯兽", "驯服", "收服", "契约灵兽", "tame", "domesticate"],
                prefix: &["驯服", "收服", "驯化", "tame", "subdue the", "bond with"],
                suffix: &["灵兽", "坐骑", "mount", "familiar"],
                contains: &["兽宠", "灵宠", "御兽", "spirit beast", "beast pact"],
                regex: &[
                    r"驯服.+兽",
                    r"收服.+",
                    r"(?i)\b(tame|subdue|bond\s+with)\s+.*(beast|wolf|tiger|serpent|mount|fox)",
                ],
            },
            &["兽园", "beast garden"],
            &["灵兽", "妖兽", "spirit beast", "wolf", "fox"],
            &[],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules::PatternRuleSet;

    #[test]
    fn test_builtin_rules_compile() {
        let set = PatternRuleSet::compile(builtin_rules()).unwrap();
        assert_eq!(set.len(), ScenarioType::ALL.len());
    }

    #[test]
    fn test_calculable_flags() {
        let set = PatternRuleSet::compile(builtin_rules()).unwrap();
        let mut calculable = set.programmatic_scenarios();
        calculable.sort();
        assert_eq!(
            calculable,
            vec![
                ScenarioType::Combat,
                ScenarioType::Breakthrough,
                ScenarioType::Cultivation,
                ScenarioType::Alchemy,
                ScenarioType::Crafting,
                ScenarioType::FormationBreaking,
                ScenarioType::PillConsumption,
            ]
        );
    }
}
