//! Locale-specific fallback and label text.

use clap::ValueEnum;
use serde::Deserialize;

use crate::models::Source;

#[derive(Debug, Deserialize, ValueEnum, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Bn,
}

impl Language {
    /// English name of the language, used when asking the model to answer in it.
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Bn => "Bengali",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Bn => "bn",
        }
    }
}

#[derive(Debug)]
pub struct StringTable {
    pub not_available: &'static str,
    pub source_database_ai_enhanced: &'static str,
    pub source_ai_generated: &'static str,
    pub source_database_only: &'static str,
    pub source_ai_unavailable: &'static str,
    pub source_ai_failed: &'static str,
    pub enhancement_unavailable: &'static str,
    pub enhancement_failed: &'static str,
    pub store_unavailable: &'static str,
    pub generic_error: &'static str,
}

impl StringTable {
    pub fn source_label(&self, source: Source) -> &'static str {
        match source {
            Source::DatabaseAiEnhanced => self.source_database_ai_enhanced,
            Source::AiGenerated => self.source_ai_generated,
            Source::DatabaseOnly => self.source_database_only,
            Source::AiUnavailable => self.source_ai_unavailable,
            Source::AiFailed => self.source_ai_failed,
        }
    }
}

static EN: StringTable = StringTable {
    not_available: "Information not available",
    source_database_ai_enhanced: "From our database, details completed by AI",
    source_ai_generated: "Generated by AI, not found in our database",
    source_database_only: "From our database (AI details unavailable)",
    source_ai_unavailable: "AI service unavailable",
    source_ai_failed: "AI could not generate details",
    enhancement_unavailable: "Smart search is unavailable; searching for your exact text.",
    enhancement_failed: "Smart search failed; searching for your exact text.",
    store_unavailable: "The medicine database could not be reached. Please try again.",
    generic_error: "Something went wrong while searching. Please try again.",
};

static HI: StringTable = StringTable {
    not_available: "जानकारी उपलब्ध नहीं है",
    source_database_ai_enhanced: "हमारे डेटाबेस से, विवरण AI द्वारा पूरे किए गए",
    source_ai_generated: "AI द्वारा तैयार, हमारे डेटाबेस में नहीं मिला",
    source_database_only: "हमारे डेटाबेस से (AI विवरण उपलब्ध नहीं)",
    source_ai_unavailable: "AI सेवा उपलब्ध नहीं है",
    source_ai_failed: "AI विवरण तैयार नहीं कर सका",
    enhancement_unavailable: "स्मार्ट खोज उपलब्ध नहीं है; आपके लिखे शब्दों से खोजा जा रहा है।",
    enhancement_failed: "स्मार्ट खोज विफल रही; आपके लिखे शब्दों से खोजा जा रहा है।",
    store_unavailable: "दवा डेटाबेस से संपर्क नहीं हो सका। कृपया फिर से प्रयास करें।",
    generic_error: "खोज के दौरान कुछ गलत हो गया। कृपया फिर से प्रयास करें।",
};

static BN: StringTable = StringTable {
    not_available: "তথ্য উপলব্ধ নেই",
    source_database_ai_enhanced: "আমাদের ডেটাবেস থেকে, বিবরণ AI দ্বারা সম্পূর্ণ",
    source_ai_generated: "AI দ্বারা তৈরি, আমাদের ডেটাবেসে পাওয়া যায়নি",
    source_database_only: "আমাদের ডেটাবেস থেকে (AI বিবরণ উপলব্ধ নেই)",
    source_ai_unavailable: "AI পরিষেবা উপলব্ধ নেই",
    source_ai_failed: "AI বিবরণ তৈরি করতে পারেনি",
    enhancement_unavailable: "স্মার্ট সার্চ উপলব্ধ নেই; আপনার লেখা শব্দ দিয়ে খোঁজা হচ্ছে।",
    enhancement_failed: "স্মার্ট সার্চ ব্যর্থ হয়েছে; আপনার লেখা শব্দ দিয়ে খোঁজা হচ্ছে।",
    store_unavailable: "ওষুধের ডেটাবেসে পৌঁছানো যায়নি। আবার চেষ্টা করুন।",
    generic_error: "খোঁজার সময় কিছু ভুল হয়েছে। আবার চেষ্টা করুন।",
};

pub fn strings(lang: Language) -> &'static StringTable {
    match lang {
        Language::En => &EN,
        Language::Hi => &HI,
        Language::Bn => &BN,
    }
}
