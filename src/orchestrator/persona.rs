//! Bot persona: display name and welcome message.

use serde::Deserialize;

const NAJD_NAME: &str = "Najd | نجد";

const NAJD_GREETING: &str = " **مرحبًا**  !🙋‍♀️

أنا **نجد**، مساعدتك الافتراضية في مجموعة التخطيط والتمكين المؤسسي.
أنا هنا لمساعدتك في الإجابة على استفساراتك المتعلقة بمجموعة التخطيط والتمكين المؤسسي. قد لا تكون إجاباتي دقيقة بنسبة 100% دائمًا،
**تفاعلك معي يساعدني على التعلم والتحسن باستمرار**.

هذه هي النسخة الأولى مني، ومع مرور الوقت سوف أتأقلم على وظيفتي الجديدة وأتعلم ويتحسن أدائي.

**أحد نقاط قوتي:**
أستطيع توصيل صوتك ومقترحاتك مع الإدارة المعنية.
عندك اقتراح؟ بس اكتب  **`/اقتراح`**  وأرسله لي، وما عليك، أزهلها والباقي عندي، بوصلها **بسرية تامة**، ولا تشيل هم.

 **شكرًا لاستخدامك لي، وأتطلع إلى مساعدتك**  !😊

 يقولون عند نجد تجد الإجابة، جرب تسألني شيء مثل كذا
 :";

const NAJD_QUICK_REPLIES: &[&str] = &[
    "وش هي ثقافة علم؟",
    "من هي نجد؟",
    "كيف أرفع اجازة؟",
    "ماهي سياسة الترقيات؟",
    "ماهي معايير قبول طلب التدريب؟",
    "/اقتراح",
];

/// Who the bot presents itself as.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Persona {
    /// Name shown on bot messages.
    pub name: String,
    /// Markdown welcome message.
    pub greeting: String,
    /// Free-text quick replies offered under the greeting.
    pub quick_replies: Vec<String>,
}

impl Persona {
    /// The HR assistant persona.
    #[must_use]
    pub fn najd() -> Self {
        Self {
            name: NAJD_NAME.to_string(),
            greeting: NAJD_GREETING.to_string(),
            quick_replies: NAJD_QUICK_REPLIES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::najd()
    }
}
