//! End-to-end: extraction answer + real images → cropped graphics → .vcf.

use cardscan::adjuster::{AdjustEvent, AdjusterConfig, GraphicAdjuster};
use cardscan::extraction::parse_response;
use cardscan::imaging::{CropConfig, ImageBackend, RustBackend};
use cardscan::naming::graphic_filename;
use cardscan::pipeline::{SlotOutcome, auto_crop, decode_sources};
use cardscan::types::{ContactField, GraphicSlot};
use cardscan::vcard::VCardExport;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use tempfile::TempDir;

const RED: Rgb<u8> = Rgb([220, 30, 30]);
const BLUE: Rgb<u8> = Rgb([30, 30, 220]);

/// 800x500 card: red left half, blue right half.
fn card_png() -> Vec<u8> {
    let img = RgbImage::from_fn(800, 500, |x, _| if x < 400 { RED } else { BLUE });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn close(actual: Rgb<u8>, expected: Rgb<u8>) -> bool {
    actual
        .0
        .iter()
        .zip(expected.0.iter())
        .all(|(a, e)| (*a as i16 - *e as i16).abs() <= 40)
}

fn center_pixel(jpeg: &[u8]) -> Rgb<u8> {
    let img = image::load_from_memory(jpeg).unwrap().to_rgb8();
    *img.get_pixel(img.width() / 2, img.height() / 2)
}

const RESPONSE: &str = r#"{
    "contact": {
        "fullName": "Jane Doe",
        "firstName": "Jane",
        "lastName": "Doe",
        "organization": "Acme Corp",
        "email": "jane@acme.example",
        "city": "Springfield",
        "logoBox": { "ymin": 0, "xmin": 500, "ymax": 1000, "xmax": 1000, "imageIndex": 0 },
        "photoBox": { "ymin": 0, "xmin": 0, "ymax": 1000, "xmax": 500, "imageIndex": 0 }
    },
    "confidence": 0.93
}"#;

#[test]
fn auto_crop_cuts_each_slot_from_its_box() {
    let backend = RustBackend::new();
    let mut contact = parse_response(RESPONSE).unwrap().contact;
    let sources = decode_sources(&backend, &[card_png()]).unwrap();

    let report = auto_crop(&backend, &mut contact, &sources, &CropConfig::default()).unwrap();

    assert_eq!(
        report.outcome(GraphicSlot::Logo),
        Some(&SlotOutcome::Cropped {
            image_index: 0,
            width: 320,
            height: 400
        })
    );
    let logo = contact.logo.as_ref().unwrap();
    assert_eq!(logo.mime, "image/jpeg");
    assert!(close(center_pixel(&logo.bytes), BLUE));

    let photo = contact.photo.as_ref().unwrap();
    assert!(close(center_pixel(&photo.bytes), RED));
}

#[test]
fn box_on_missing_image_leaves_slot_empty() {
    let backend = RustBackend::new();
    let mut contact = parse_response(
        r#"{"fullName":"Jane Doe","photoBox":{"ymin":0,"xmin":0,"ymax":500,"xmax":500,"imageIndex":3}}"#,
    )
    .unwrap()
    .contact;
    let sources = decode_sources(&backend, &[card_png()]).unwrap();

    let report = auto_crop(&backend, &mut contact, &sources, &CropConfig::default()).unwrap();

    assert_eq!(report.cropped_count(), 0);
    assert!(contact.photo.is_none());
    assert!(VCardExport::from_contact(&contact).content.contains("FN:Jane Doe"));
}

#[test]
fn undecodable_image_is_an_error() {
    let backend = RustBackend::new();
    assert!(decode_sources(&backend, &[card_png(), b"not an image".to_vec()]).is_err());
}

#[test]
fn adjuster_pan_moves_content_and_apply_has_no_guide() {
    let backend = RustBackend::new();
    let sources = vec![backend.decode(&card_png()).unwrap()];
    let mut adjuster = GraphicAdjuster::open(
        &backend,
        &sources,
        GraphicSlot::Photo,
        None,
        AdjusterConfig::default(),
    )
    .unwrap();
    assert!((adjuster.state().zoom - 0.8).abs() < 1e-9);

    // Shift the image right so the canvas center lands on the red half.
    assert!(adjuster.handle(AdjustEvent::Pan { dx: 100.0, dy: 0.0 }));

    let preview = adjuster.preview().unwrap();
    let corner = preview.get_pixel(2, 2);
    let image = adjuster.apply().unwrap();

    assert_eq!((image.width, image.height), (400, 400));
    let saved = image::load_from_memory(&image.bytes).unwrap().to_rgb8();
    assert!(close(*saved.get_pixel(200, 200), RED));
    // The preview dims the corner; the saved image keeps full brightness.
    assert!(saved.get_pixel(2, 200).0[0] > corner.0[0]);
}

#[test]
fn card_exports_to_named_vcf() {
    let tmp = TempDir::new().unwrap();
    let backend = RustBackend::new();
    let mut contact = parse_response(RESPONSE).unwrap().contact;
    contact.set(ContactField::JobTitle, "Head of Sales");
    let sources = decode_sources(&backend, &[card_png()]).unwrap();
    auto_crop(&backend, &mut contact, &sources, &CropConfig::default()).unwrap();

    let export = VCardExport::from_contact(&contact);
    let path = export.write_to(tmp.path()).unwrap();

    assert_eq!(path.file_name().unwrap(), "Jane_Doe.vcf");
    assert_eq!(export.mime, "text/vcard");
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "BEGIN:VCARD\n\
         VERSION:3.0\n\
         FN:Jane Doe\n\
         N:Doe;Jane;;;\n\
         ORG:Acme Corp\n\
         TITLE:Head of Sales\n\
         EMAIL;TYPE=INTERNET,PREF:jane@acme.example\n\
         ADR;TYPE=WORK:;;;Springfield;;;\n\
         END:VCARD"
    );
    assert_eq!(
        graphic_filename(GraphicSlot::Logo, contact.logo.as_ref().unwrap()),
        "logo.jpg"
    );
}
