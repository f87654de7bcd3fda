// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Barcode transcoding
//!
//! Every barcode document carries `rawValue`, `displayValue`, `format` and
//! `valueType`, plus at most one payload key chosen by the value type.

use serde_json::{json, Map, Value};

use super::{insert_bounding_box, points, text_or_null};
use crate::vision::native::{
    Address, Barcode, BarcodeValue, CalendarEvent, ContactInfo, DriverLicense, Email, GeoPoint,
    PersonName, Phone, Sms, UrlBookmark, WiFi,
};

/// Convert scanned barcodes into a sequence of documents
pub fn transcode_barcodes(barcodes: &[Barcode]) -> Value {
    Value::Array(barcodes.iter().map(barcode_document).collect())
}

fn barcode_document(barcode: &Barcode) -> Value {
    let mut doc = Map::new();

    insert_bounding_box(&mut doc, barcode.bounding_box);
    if let Some(corners) = &barcode.corner_points {
        doc.insert("points".into(), points(corners));
    }

    doc.insert("rawValue".into(), text_or_null(barcode.raw_value.as_deref()));
    doc.insert(
        "displayValue".into(),
        text_or_null(barcode.display_value.as_deref()),
    );
    doc.insert("format".into(), Value::from(barcode.format));
    doc.insert("valueType".into(), Value::from(barcode.value_type()));

    if let Some((key, payload)) = payload(&barcode.value) {
        doc.insert(key.into(), payload);
    }

    Value::Object(doc)
}

/// Payload key and document for value types that carry structured content
fn payload(value: &BarcodeValue) -> Option<(&'static str, Value)> {
    match value {
        BarcodeValue::Email(email) => Some(("email", email_document(email))),
        BarcodeValue::Phone(phone) => Some(("phone", phone_document(phone))),
        BarcodeValue::Sms(sms) => Some(("sms", sms_document(sms))),
        BarcodeValue::Url(url) => Some(("url", url_document(url))),
        BarcodeValue::Wifi(wifi) => Some(("wifi", wifi_document(wifi))),
        BarcodeValue::Geo(geo) => Some(("geoPoint", geo_document(geo))),
        BarcodeValue::ContactInfo(contact) => Some(("contactInfo", contact_document(contact))),
        BarcodeValue::CalendarEvent(event) => Some(("calendarEvent", calendar_document(event))),
        BarcodeValue::DriverLicense(license) => {
            Some(("driverLicense", driver_license_document(license)))
        }
        BarcodeValue::Unknown
        | BarcodeValue::Isbn
        | BarcodeValue::Product
        | BarcodeValue::Text
        | BarcodeValue::Unrecognized(_) => None,
    }
}

fn email_document(email: &Email) -> Value {
    json!({
        "type": email.kind,
        "address": email.address,
        "body": email.body,
        "subject": email.subject,
    })
}

fn phone_document(phone: &Phone) -> Value {
    json!({
        "number": phone.number,
        "type": phone.kind,
    })
}

fn sms_document(sms: &Sms) -> Value {
    json!({
        "message": sms.message,
        "phoneNumber": sms.phone_number,
    })
}

fn url_document(url: &UrlBookmark) -> Value {
    json!({
        "title": url.title,
        "url": url.url,
    })
}

fn wifi_document(wifi: &WiFi) -> Value {
    json!({
        "ssid": wifi.ssid,
        "password": wifi.password,
        "encryptionType": wifi.encryption_type,
    })
}

fn geo_document(geo: &GeoPoint) -> Value {
    json!({
        "latitude": geo.lat,
        "longitude": geo.lng,
    })
}

fn address_document(address: &Address) -> Value {
    let mut doc = Map::new();
    if let Some(lines) = &address.address_lines {
        doc.insert("addressLines".into(), json!(lines));
    }
    doc.insert("type".into(), Value::from(address.kind));
    Value::Object(doc)
}

fn name_document(name: &PersonName) -> Value {
    json!({
        "formattedName": name.formatted_name,
        "first": name.first,
        "last": name.last,
        "middle": name.middle,
        "prefix": name.prefix,
        "pronunciation": name.pronunciation,
        "suffix": name.suffix,
    })
}

fn contact_document(contact: &ContactInfo) -> Value {
    let mut doc = Map::new();

    doc.insert(
        "addresses".into(),
        Value::Array(contact.addresses.iter().map(address_document).collect()),
    );
    doc.insert(
        "emails".into(),
        Value::Array(contact.emails.iter().map(email_document).collect()),
    );
    if let Some(name) = &contact.name {
        doc.insert("name".into(), name_document(name));
    }
    doc.insert(
        "phones".into(),
        Value::Array(contact.phones.iter().map(phone_document).collect()),
    );
    if let Some(urls) = &contact.urls {
        doc.insert("urls".into(), json!(urls));
    }
    doc.insert("jobTitle".into(), text_or_null(contact.title.as_deref()));
    doc.insert(
        "organization".into(),
        text_or_null(contact.organization.as_deref()),
    );

    Value::Object(doc)
}

fn calendar_document(event: &CalendarEvent) -> Value {
    let mut doc = Map::new();

    doc.insert(
        "eventDescription".into(),
        text_or_null(event.description.as_deref()),
    );
    doc.insert("location".into(), text_or_null(event.location.as_deref()));
    doc.insert("organizer".into(), text_or_null(event.organizer.as_deref()));
    doc.insert("status".into(), text_or_null(event.status.as_deref()));
    doc.insert("summary".into(), text_or_null(event.summary.as_deref()));
    if let Some(start) = &event.start {
        doc.insert("start".into(), text_or_null(start.raw_value.as_deref()));
    }
    if let Some(end) = &event.end {
        doc.insert("end".into(), text_or_null(end.raw_value.as_deref()));
    }

    Value::Object(doc)
}

fn driver_license_document(license: &DriverLicense) -> Value {
    json!({
        "firstName": license.first_name,
        "middleName": license.middle_name,
        "lastName": license.last_name,
        "gender": license.gender,
        "addressCity": license.address_city,
        "addressStreet": license.address_street,
        "addressState": license.address_state,
        "addressZip": license.address_zip,
        "birthDate": license.birth_date,
        "documentType": license.document_type,
        "licenseNumber": license.license_number,
        "expiryDate": license.expiry_date,
        "issuingDate": license.issue_date,
        "issuingCountry": license.issuing_country,
    })
}
