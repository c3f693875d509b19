//! Minimal AcroForm PDFs built in-process for tests.

use lopdf::{dictionary, Document, Object, Stream};

pub enum FixtureField {
    Text(&'static str),
    Checkbox(&'static str),
    Choice(&'static str),
    /// A text field `child` under a non-terminal parent field that declares `/FT`.
    Nested(&'static str, &'static str),
    /// A checkbox field with two separate widget kids and the given on-state.
    SplitCheckbox(&'static str, &'static str),
    /// A text field whose widget already carries an appearance stream.
    TextWithAppearance(&'static str),
}

/// The fields of the CJP 34 template.
pub const CJP34_FIELDS: &[FixtureField] = &[
    FixtureField::Text("oldName"),
    FixtureField::Text("newName"),
    FixtureField::Text("dateOfBirth"),
    FixtureField::Text("mothersMaidenName"),
    FixtureField::Text("otherNamesOrAliases"),
    FixtureField::Checkbox("isChangeOfNameProceeding"),
];

/// The fields of the CJP 27 template.
pub const CJP27_FIELDS: &[FixtureField] = &[
    FixtureField::Text("county"),
    FixtureField::Text("oldName"),
    FixtureField::Text("signatureName"),
    FixtureField::Text("newName"),
    FixtureField::Text("dateOfBirth"),
    FixtureField::Text("residenceStreetAddress"),
    FixtureField::Text("residenceCity"),
    FixtureField::Text("residenceState"),
    FixtureField::Text("residenceZipCode"),
    FixtureField::Text("mailingStreetAddress"),
    FixtureField::Text("mailingCity"),
    FixtureField::Text("mailingState"),
    FixtureField::Text("mailingZipCode"),
    FixtureField::Text("phoneNumber"),
    FixtureField::Text("email"),
    FixtureField::Text("pronouns"),
    FixtureField::Checkbox("hasPreviousNameChangeTrue"),
    FixtureField::Checkbox("hasPreviousNameChangeFalse"),
    FixtureField::Text("previousNameFrom"),
    FixtureField::Text("previousNameTo"),
    FixtureField::Text("previousNameReason"),
    FixtureField::Text("reasonForChangingName"),
    FixtureField::Checkbox("isInterpreterNeededTrue"),
    FixtureField::Checkbox("isInterpreterNeededFalse"),
    FixtureField::Text("language"),
];

/// Build a one-page PDF whose AcroForm holds `fields`, in order.
pub fn template(fields: &[FixtureField]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
    });

    let mut roots = Vec::new();
    let mut annots = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        let top = 760 - 24 * i as i64;
        let mut widget = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "P" => page_id,
            "Rect" => vec![
                Object::Integer(72),
                Object::Integer(top - 16),
                Object::Integer(360),
                Object::Integer(top),
            ],
        };
        match field {
            FixtureField::Text(name) => {
                widget.set("FT", "Tx");
                widget.set("T", Object::string_literal(*name));
                let id = doc.add_object(widget);
                roots.push(Object::Reference(id));
                annots.push(Object::Reference(id));
            }
            FixtureField::Checkbox(name) => {
                let on = doc.add_object(Stream::new(dictionary! {}, b"0 g".to_vec()));
                let off = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
                widget.set("FT", "Btn");
                widget.set("T", Object::string_literal(*name));
                widget.set("V", "Off");
                widget.set("AS", "Off");
                widget.set(
                    "AP",
                    dictionary! { "N" => dictionary! { "Yes" => on, "Off" => off } },
                );
                let id = doc.add_object(widget);
                roots.push(Object::Reference(id));
                annots.push(Object::Reference(id));
            }
            FixtureField::Choice(name) => {
                widget.set("FT", "Ch");
                widget.set("T", Object::string_literal(*name));
                let id = doc.add_object(widget);
                roots.push(Object::Reference(id));
                annots.push(Object::Reference(id));
            }
            FixtureField::Nested(parent, child) => {
                let parent_id = doc.new_object_id();
                widget.set("T", Object::string_literal(*child));
                widget.set("Parent", parent_id);
                let child_id = doc.add_object(widget);
                doc.objects.insert(
                    parent_id,
                    Object::Dictionary(dictionary! {
                        "FT" => "Tx",
                        "T" => Object::string_literal(*parent),
                        "Kids" => vec![Object::Reference(child_id)],
                    }),
                );
                roots.push(Object::Reference(parent_id));
                annots.push(Object::Reference(child_id));
            }
            FixtureField::SplitCheckbox(name, on) => {
                let parent_id = doc.new_object_id();
                let mut kids = Vec::new();
                for _ in 0..2 {
                    let on_ap = doc.add_object(Stream::new(dictionary! {}, b"0 g".to_vec()));
                    let off_ap = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
                    let mut kid = widget.clone();
                    kid.set("Parent", parent_id);
                    kid.set("AS", "Off");
                    kid.set(
                        "AP",
                        dictionary! { "N" => dictionary! { *on => on_ap, "Off" => off_ap } },
                    );
                    let kid_id = doc.add_object(kid);
                    kids.push(Object::Reference(kid_id));
                    annots.push(Object::Reference(kid_id));
                }
                doc.objects.insert(
                    parent_id,
                    Object::Dictionary(dictionary! {
                        "FT" => "Btn",
                        "T" => Object::string_literal(*name),
                        "V" => "Off",
                        "Kids" => kids,
                    }),
                );
                roots.push(Object::Reference(parent_id));
            }
            FixtureField::TextWithAppearance(name) => {
                let ap = doc.add_object(Stream::new(dictionary! {}, b"/Tx BMC EMC".to_vec()));
                widget.set("FT", "Tx");
                widget.set("T", Object::string_literal(*name));
                widget.set("AP", dictionary! { "N" => ap });
                let id = doc.add_object(widget);
                roots.push(Object::Reference(id));
                annots.push(Object::Reference(id));
            }
        }
    }

    if let Ok(page) = doc.get_dictionary_mut(page_id) {
        page.set("Annots", annots);
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        }),
    );
    let acroform_id = doc.add_object(dictionary! { "Fields" => roots });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "AcroForm" => acroform_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("fixture PDF serialises");
    out
}
