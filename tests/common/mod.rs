//! Shared fixtures for integration tests.

#![allow(dead_code)]

use teixcerpt::lookup::{LookupTables, MetadataResolver, Table};

pub const INSTANCES_CSV: &str = r#"id,tibschol_ref,relations,item_description,dimension
1,T001,"[{'label': 'has as an instance', 'subj': {'label': 'Tshad ma rigs gter (12)'}, 'obj': {'label': 'T001 (1)'}}, {'label': 'writen at', 'subj': {'label': 'T001 (1)'}, 'obj': {'label': 'Sa skya (5)'}}, {'label': 'scribe of', 'subj': {'label': 'Kun dga (77)'}, 'obj': {'label': 'T001 (1)'}}]",Complete dbu med manuscript,45 × 8
2,T002,"[{""label"": ""has as an instance"", ""subj"": {""label"": ""Lost work (99)""}, ""obj"": {""label"": ""T002 (2)""}}]",,
3,T003 T003b,[],,
4,T003,[],,
"#;

pub const WORKS_CSV: &str = r#"url,relations
https://tibschol.example.org/apis/work/12/,"[{'label': 'is author of', 'subj': {'label': 'Sakya Paṇḍita (481)'}, 'obj': {'label': 'Tshad ma rigs gter (12)'}}]"
"#;

pub const PERSONS_CSV: &str = "url,name\nhttps://tibschol.example.org/apis/person/481/,Sakya Paṇḍita\n";

pub fn resolver() -> MetadataResolver {
    let tables = LookupTables::new(
        Table::from_reader(INSTANCES_CSV.as_bytes()).unwrap(),
        Table::from_reader(WORKS_CSV.as_bytes()).unwrap(),
        Some(Table::from_reader(PERSONS_CSV.as_bytes()).unwrap()),
    );
    MetadataResolver::new(tables).unwrap()
}

/// A TEI document with the given idno and body content.
pub fn tei(idno: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader>
    <fileDesc>
      <titleStmt>
        <title>Draft title</title>
        <author>Unknown</author>
        <principal>Jane Doe</principal>
        <funder>Austrian Science Fund</funder>
      </titleStmt>
      <publicationStmt><p>Unpublished</p></publicationStmt>
      <sourceDesc>
        <msDesc><msIdentifier><idno type="TibSchol">{}</idno></msIdentifier></msDesc>
      </sourceDesc>
    </fileDesc>
    <encodingDesc><p>Encoded by hand</p></encodingDesc>
    <profileDesc><langUsage><language ident="bo"/></langUsage></profileDesc>
    <revisionDesc><change when="2024-01-01">created</change></revisionDesc>
  </teiHeader>
  <text>
    <body>
{}
    </body>
  </text>
</TEI>
"#,
        idno, body
    )
}

/// Body with three accepted excerpts, one draft and skipped prose between.
pub const THREE_EXCERPTS: &str = r#"      <p>Opening prose that is not excerpted.</p>
      <p><seg type="excerpt" status="finalized">first <hi rend="bold">excerpt</hi></seg></p>
      <p>Skipped commentary.</p>
      <seg type="excerpt" status="draft">draft excerpt</seg>
      <div><p><seg type="excerpt" status="reviewed">second excerpt</seg></p></div>
      <seg type="excerpt" status="edited">third <note>with note</note> excerpt</seg>"#;
