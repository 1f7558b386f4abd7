use std::collections::HashMap;

use truthlens_fusion::oracle::{analyze, ContentPayload, Oracle, OracleError};
use truthlens_fusion::sanitize::FALLBACK_FLAG;
use truthlens_fusion::{FusionPolicy, Modality, SharedSession, Verdict};

/// Replies with a canned output per modality.
struct ScriptedOracle {
    replies: HashMap<Modality, Result<String, OracleError>>,
}

impl Oracle for ScriptedOracle {
    fn judge(&self, payload: &ContentPayload) -> Result<String, OracleError> {
        self.replies
            .get(&payload.modality())
            .cloned()
            .unwrap_or_else(|| Err(OracleError::Unavailable("no script".into())))
    }
}

fn oracle() -> ScriptedOracle {
    let mut replies = HashMap::new();
    replies.insert(
        Modality::Text,
        Ok(r#"{"verdict":"authentic","confidence":92,"explanation":"Neutral tone, verifiable claims.","details":[{"label":"Factual accuracy","value":"High","type":"positive"}],"flags":[]}"#.to_string()),
    );
    replies.insert(
        Modality::Url,
        Ok("```json\n{\"verdict\":\"authentic\",\"confidence\":88,\"explanation\":\"Known news domain.\"}\n```".to_string()),
    );
    replies.insert(
        Modality::Image,
        Ok(r#"{"verdict":"fake","confidence":91,"explanation":"Blending artifacts around the face.","details":[{"label":"AI Generation","value":"Detected","type":"negative"}],"flags":["face swap"]}"#.to_string()),
    );
    replies.insert(Modality::Audio, Ok("The audio seems fine to me.".to_string()));
    replies.insert(Modality::Document, Err(OracleError::CreditsExhausted));
    ScriptedOracle { replies }
}

fn text() -> ContentPayload {
    ContentPayload::Text { content: "Officials confirmed the bridge reopened on Monday.".into() }
}

fn url() -> ContentPayload {
    ContentPayload::Url { content: "https://www.bbc.com/news/articles/c1".into() }
}

fn image() -> ContentPayload {
    ContentPayload::Image { image_base64: "iVBORw0KGgo=".into(), mime_type: "image/png".into() }
}

#[test]
fn session_progresses_from_authentic_to_fake() {
    let session = SharedSession::new(FusionPolicy::default());
    let oracle = oracle();

    analyze(&session, &oracle, &text()).unwrap();
    analyze(&session, &oracle, &url()).unwrap();
    let (_, fusion) = session.snapshot();
    let fusion = fusion.unwrap();
    assert_eq!(fusion.overall_verdict, Verdict::Authentic);
    assert_eq!(fusion.overall_confidence, 90);
    assert!(fusion.fusion_explanation.contains("All 2 analyzed modalities"));

    let image = analyze(&session, &oracle, &image()).unwrap();
    assert_eq!(image.flags, vec!["face swap".to_string()]);
    let (results, fusion) = session.snapshot();
    let fusion = fusion.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(fusion.overall_verdict, Verdict::Fake);
    assert_eq!(fusion.overall_confidence, 90);
    assert_eq!(fusion.modalities, results);
}

#[test]
fn unusable_output_becomes_inconclusive_vote() {
    let session = SharedSession::default();
    let oracle = oracle();

    analyze(&session, &oracle, &text()).unwrap();
    let audio = ContentPayload::Audio {
        audio_base64: "SUQz".into(),
        file_name: "clip.mp3".into(),
        mime_type: "audio/mpeg".into(),
    };
    let r = analyze(&session, &oracle, &audio).unwrap();
    assert_eq!(r.verdict, Verdict::Suspicious);
    assert_eq!(r.flags, vec![FALLBACK_FLAG.to_string()]);

    let (_, fusion) = session.snapshot();
    assert_eq!(fusion.unwrap().overall_verdict, Verdict::Suspicious);
}

#[test]
fn failed_call_does_not_vote() {
    let session = SharedSession::default();
    let oracle = oracle();

    analyze(&session, &oracle, &text()).unwrap();
    let doc = ContentPayload::Document {
        document_base64: "JVBERi0=".into(),
        file_name: "memo.pdf".into(),
        mime_type: "application/pdf".into(),
    };
    let err = analyze(&session, &oracle, &doc).unwrap_err();
    assert_eq!(err, OracleError::CreditsExhausted);

    let (results, fusion) = session.snapshot();
    assert_eq!(results.len(), 1);
    assert_eq!(fusion.unwrap().modalities.len(), 1);
}

#[test]
fn repeated_modality_is_a_separate_vote() {
    let session = SharedSession::default();
    let oracle = oracle();

    analyze(&session, &oracle, &text()).unwrap();
    analyze(&session, &oracle, &text()).unwrap();
    let (results, fusion) = session.snapshot();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.modality == Modality::Text));
    assert_eq!(fusion.unwrap().modalities.len(), 2);

    session.clear();
    let (results, fusion) = session.snapshot();
    assert!(results.is_empty());
    assert!(fusion.is_none());
}
