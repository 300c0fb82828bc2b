//! Locales, text direction and the UI string table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "ar" => Some(Self::Ar),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Ar)
    }

    #[must_use]
    pub const fn direction(self) -> TextDirection {
        if self.is_rtl() {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }

    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::En => Self::Ar,
            Self::Ar => Self::En,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Picks the string for `locale` out of an inline English/Arabic pair.
#[must_use]
pub const fn tr(locale: Locale, en: &'static str, ar: &'static str) -> &'static str {
    match locale {
        Locale::En => en,
        Locale::Ar => ar,
    }
}

/// A string carried in both supported languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub ar: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: ar.into(),
        }
    }

    #[must_use]
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
        }
    }
}

/// Keys for fixed interface strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    AppName,
    NavHome,
    NavDiagnostics,
    NavImageAnalysis,
    NavSymptomChecker,
    NavChat,
    NavDashboard,
    NavLogin,
    NavRegister,
    HomeTitle,
    DiagnosticsTitle,
    ImageAnalysisTitle,
    ImageAnalysisSubtitle,
    SymptomCheckerTitle,
    SymptomCheckerSubtitle,
    ChatTitle,
    ChatSubtitle,
    DashboardTitle,
    LoginTitle,
    RegisterTitle,
    NotFoundTitle,
    Analyze,
    Analyzing,
    AnalysisError,
    ImageUploaded,
    NoSymptomsFound,
    NothingSelected,
    Disclaimer,
    PalmFeatureOutOfRange,
    FieldsRequired,
    InvalidCredentials,
    RegistrationFailed,
    StrengthWeak,
    StrengthFair,
    StrengthGood,
    StrengthStrong,
}

impl Text {
    #[must_use]
    pub const fn get(self, locale: Locale) -> &'static str {
        match self {
            Self::AppName => tr(locale, "DoctorAI", "دكتور AI"),
            Self::NavHome => tr(locale, "Home", "الرئيسية"),
            Self::NavDiagnostics => tr(locale, "Diagnostics", "التشخيص"),
            Self::NavImageAnalysis => tr(locale, "Image Analysis", "تحليل الصور"),
            Self::NavSymptomChecker => tr(locale, "Symptom Checker", "فاحص الأعراض"),
            Self::NavChat => tr(locale, "Chat Assistant", "مساعد الدردشة"),
            Self::NavDashboard => tr(locale, "Dashboard", "لوحة التحكم"),
            Self::NavLogin => tr(locale, "Login", "تسجيل الدخول"),
            Self::NavRegister => tr(locale, "Register", "التسجيل"),
            Self::HomeTitle => tr(
                locale,
                "AI-Powered Medical Diagnostics",
                "التشخيص الطبي بالذكاء الاصطناعي",
            ),
            Self::DiagnosticsTitle => tr(locale, "Diagnostic Tools", "أدوات التشخيص"),
            Self::ImageAnalysisTitle => tr(locale, "Medical Image Analysis", "تحليل الصور الطبية"),
            Self::ImageAnalysisSubtitle => tr(
                locale,
                "Upload medical images such as X-rays, MRIs, or CT scans for AI-powered analysis and diagnosis.",
                "قم بتحميل الصور الطبية مثل الأشعة السينية أو التصوير بالرنين المغناطيسي أو الأشعة المقطعية للتحليل والتشخيص بواسطة الذكاء الاصطناعي.",
            ),
            Self::SymptomCheckerTitle => tr(locale, "Symptom Checker", "فاحص الأعراض"),
            Self::SymptomCheckerSubtitle => tr(
                locale,
                "Select your symptoms or input palm disease features for a preliminary assessment.",
                "حدد أعراضك أو أدخل ميزات مرض النخيل للحصول على تقييم أولي.",
            ),
            Self::ChatTitle => tr(locale, "Medical Chat Assistant", "مساعد الدردشة الطبي"),
            Self::ChatSubtitle => tr(
                locale,
                "Ask about your health concerns or palm plant issues.",
                "اسأل عن مخاوفك الصحية أو مشاكل نبات النخيل.",
            ),
            Self::DashboardTitle => tr(locale, "Your Health Dashboard", "لوحة صحتك"),
            Self::LoginTitle => tr(locale, "Sign in to your account", "تسجيل الدخول إلى حسابك"),
            Self::RegisterTitle => tr(locale, "Create an account", "إنشاء حساب"),
            Self::NotFoundTitle => tr(locale, "Page not found", "الصفحة غير موجودة"),
            Self::Analyze => tr(locale, "Analyze", "تحليل"),
            Self::Analyzing => tr(locale, "Analyzing...", "جاري التحليل..."),
            Self::AnalysisError => tr(locale, "Analysis Error", "خطأ في التحليل"),
            Self::ImageUploaded => tr(locale, "Image uploaded successfully!", "تم تحميل الصورة بنجاح!"),
            Self::NoSymptomsFound => tr(
                locale,
                "No symptoms found. Try a different search term.",
                "لم يتم العثور على أعراض. جرب مصطلح بحث مختلف.",
            ),
            Self::NothingSelected => tr(
                locale,
                "No symptoms or features selected. Please select from above.",
                "لم يتم تحديد أعراض أو ميزات. يرجى التحديد من الأعلى.",
            ),
            Self::Disclaimer => tr(
                locale,
                "Note: This assessment is for informational purposes only and should not replace professional medical or agricultural advice.",
                "ملاحظة: هذا التقييم لأغراض إعلامية فقط ولا ينبغي أن يحل محل المشورة الطبية أو الزراعية المهنية.",
            ),
            Self::PalmFeatureOutOfRange => tr(
                locale,
                "Feature values must be between 0 and 10",
                "يجب أن تكون قيم الميزات بين 0 و10",
            ),
            Self::FieldsRequired => tr(
                locale,
                "Please fill in all required fields",
                "يرجى ملء جميع الحقول المطلوبة",
            ),
            Self::InvalidCredentials => tr(locale, "Invalid credentials", "بيانات الاعتماد غير صالحة"),
            Self::RegistrationFailed => tr(locale, "Registration failed", "فشل التسجيل"),
            Self::StrengthWeak => tr(locale, "Weak", "ضعيف"),
            Self::StrengthFair => tr(locale, "Fair", "مقبول"),
            Self::StrengthGood => tr(locale, "Good", "جيد"),
            Self::StrengthStrong => tr(locale, "Strong", "قوي"),
        }
    }
}
