//! Prompt construction: assembles the goal, learner profile context, and
//! tone directive into the instruction the model answers with pure JSON.
//!
//! All prompt text is Indonesian, matching the product's audience. This
//! module contains pure logic only.

use super::LearnerProfile;

/// JSON output contract included in the generation prompt.
const JSON_CONTRACT: &str = r#"Format output HARUS berupa JSON yang valid dengan struktur seperti ini (jangan gunakan komentar, hanya JSON murni):
{
  "title": "Judul Roadmap",
  "goal": "Tujuan",
  "milestones": [
    {
      "title": "Judul Milestone",
      "description": "Deskripsi Detail",
      "timeframe": "Jangka Waktu",
      "resources": [
        {
          "title": "Judul Sumber",
          "url": "URL Sumber",
          "type": "link|video|document"
        }
      ]
    }
  ]
}"#;

/// Context sentence for the learner's education level.
fn education_context(profile: &LearnerProfile) -> &'static str {
    if profile.education_level.as_deref() == Some("sma") {
        "Pengguna masih di SMA, jadi fokus pada persiapan masuk perguruan tinggi, UTBK/SBMPTN, dan jalur-jalur pendidikan lanjutan."
    } else {
        "Pengguna sudah di perguruan tinggi, jadi fokus pada spesialisasi, magang, dan persiapan karir."
    }
}

/// Context sentence for the learner's focus area.
fn focus_context(profile: &LearnerProfile) -> &'static str {
    if profile.focus_area.as_deref() == Some("pendidikan") {
        "Pengguna ingin fokus pada jalur pendidikan formal."
    } else {
        "Pengguna ingin fokus pada mendapatkan pengalaman praktis dan keterampilan."
    }
}

/// Tone directive derived from the playful flag.
fn tone_directive(playful: bool) -> &'static str {
    if playful {
        "Gunakan bahasa yang santai dan selingi dengan motivasi atau humor ringan."
    } else {
        "Gunakan bahasa yang profesional dan fokus pada informasi faktual."
    }
}

/// Build the roadmap generation prompt.
///
/// The goal is embedded as `tujuan: "<goal>"`; offline synthesis keys off
/// that exact marker.
pub fn build_roadmap_prompt(goal: &str, profile: &LearnerProfile, playful: bool) -> String {
    format!(
        "Buatkan roadmap detail dalam format JSON untuk mencapai tujuan: \"{goal}\".\n\
         \n\
         Informasi tambahan:\n\
         - {education}\n\
         - {focus}\n\
         - {tone}\n\
         \n\
         Roadmap harus mencakup milestone dengan:\n\
         1. Judul milestone yang jelas dan spesifik\n\
         2. Deskripsi detail untuk setiap milestone\n\
         3. Perkiraan jangka waktu pencapaian\n\
         4. 1-3 sumber daya online yang relevan untuk setiap milestone (URL fiktif juga boleh)\n\
         \n\
         {contract}\n\
         \n\
         Roadmap harus kontekstual dengan sistem pendidikan dan peluang karir di Indonesia. \
         Berikan 3-5 milestone yang realistis dan berurutan.",
        education = education_context(profile),
        focus = focus_context(profile),
        tone = tone_directive(playful),
        contract = JSON_CONTRACT,
    )
}

/// Build the short motivational-message prompt.
pub fn build_motivation_prompt(
    goal: Option<&str>,
    progress_percent: Option<u8>,
    playful: bool,
) -> String {
    let goal = goal.unwrap_or("tujuan mereka");
    let progress = match progress_percent {
        Some(p) => format!(" Mereka sudah mencapai {p}% dari target mereka."),
        None => String::new(),
    };
    let tone = if playful {
        "Gunakan bahasa yang santai dan menyenangkan."
    } else {
        "Gunakan bahasa yang inspiratif dan profesional."
    };
    format!(
        "Berikan pesan motivasi singkat (maksimal 100 karakter) untuk pengguna yang sedang \
         berusaha mencapai: \"{goal}\".{progress} {tone} \
         Jangan gunakan tanda kutip di pesan motivasi."
    )
}

/// Hidden context message prepended to a conversation when the user has an
/// active roadmap.
pub fn build_context_message(roadmap_goal: &str) -> String {
    format!(
        "Berikut adalah konteks roadmap pengguna: {roadmap_goal}. \
         Gunakan informasi ini untuk memberikan saran yang relevan. \
         Jangan ungkapkan bahwa kamu diberikan konteks ini."
    )
}
