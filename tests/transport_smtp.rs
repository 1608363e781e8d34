#[cfg(all(feature = "smtp-transport", feature = "builder"))]
mod test {
    use std::{
        io::{BufRead, BufReader, Write},
        net::{SocketAddr, TcpListener},
        thread::{self, JoinHandle},
        time::Duration,
    };

    use missive::{
        transport::smtp::{
            authentication::{Credentials, Mechanism},
            extension::ClientId,
            SmtpTransportBuilder,
        },
        Envelope, Message, SmtpTransport,
    };
    use pretty_assertions::assert_eq;

    /// What the scripted server saw: the commands and the DATA payload
    #[derive(Debug, Default)]
    struct Transcript {
        commands: Vec<String>,
        data: Option<String>,
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    /// Serves a single SMTP session, answering every command with `reply`
    ///
    /// `DATA` is handled by the server itself: `354`, then the payload up to
    /// the `.` line, then `250`. The session ends after `QUIT` or when the
    /// client closes the connection.
    fn serve<F>(reply: F) -> (SocketAddr, JoinHandle<Transcript>)
    where
        F: Fn(&str) -> String + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(10)))
                .unwrap();
            let mut writer = stream.try_clone().unwrap();
            let mut reader = BufReader::new(stream);
            let mut transcript = Transcript::default();

            writer.write_all(b"220 mock.test ESMTP ready\r\n").unwrap();

            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    break;
                }
                let command = line.trim_end_matches("\r\n").to_owned();
                transcript.commands.push(command.clone());

                if command == "DATA" {
                    writer.write_all(b"354 end data with <CR><LF>.<CR><LF>\r\n").unwrap();
                    let mut data = String::new();
                    loop {
                        let mut line = String::new();
                        if reader.read_line(&mut line).unwrap_or(0) == 0 || line == ".\r\n" {
                            break;
                        }
                        data.push_str(&line);
                    }
                    transcript.data = Some(data);
                    writer.write_all(b"250 2.0.0 queued as 1\r\n").unwrap();
                    continue;
                }

                let is_quit = command == "QUIT";
                writer.write_all(reply(&command).as_bytes()).unwrap();
                if is_quit {
                    break;
                }
            }

            transcript
        });

        (addr, handle)
    }

    /// Replies of a server advertising `extensions` and accepting everything
    fn accept_all(extensions: &'static [&'static str]) -> impl Fn(&str) -> String {
        move |command| {
            if command.starts_with("EHLO") {
                ehlo_reply(extensions)
            } else if command == "QUIT" {
                "221 2.0.0 bye\r\n".to_owned()
            } else {
                "250 2.0.0 ok\r\n".to_owned()
            }
        }
    }

    fn ehlo_reply(extensions: &[&str]) -> String {
        let mut lines = vec!["mock.test"];
        lines.extend_from_slice(extensions);

        let last = lines.len() - 1;
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let separator = if i == last { ' ' } else { '-' };
                format!("250{separator}{line}\r\n")
            })
            .collect()
    }

    fn builder(addr: SocketAddr) -> SmtpTransportBuilder {
        SmtpTransport::builder_dangerous(addr.ip().to_string())
            .port(addr.port())
            .hello_name(ClientId::Domain("client.test".to_owned()))
            .timeout(Some(Duration::from_secs(10)))
    }

    fn sealed_message(envelope: Envelope) -> Message {
        let mut message = Message::new(envelope);
        message.text("hello").unwrap();
        message.seal().unwrap();
        message
    }

    #[test]
    fn plain_session_without_extensions() {
        init_tracing();
        let (addr, server) = serve(accept_all(&[]));

        let message = sealed_message(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        let expected = message.formatted().unwrap().to_vec();
        // no AUTH advertised, the credentials are not used
        let mailer = builder(addr)
            .credentials(Credentials::new("user".to_owned(), "password".to_owned()))
            .build();
        let response = mailer.send(message).unwrap();
        assert!(response.is_positive());

        let transcript = server.join().unwrap();
        assert_eq!(
            transcript.commands,
            [
                "EHLO client.test",
                "MAIL FROM:<a@x.com>",
                "RCPT TO:<b@x.com>",
                "DATA",
                "QUIT"
            ]
        );
        assert_eq!(
            transcript.data.as_deref().map(str::as_bytes),
            Some(&expected[..])
        );
    }

    #[test]
    fn one_message_for_several_transports() {
        init_tracing();
        let (first_addr, first) = serve(accept_all(&[]));
        let (second_addr, second) = serve(accept_all(&["8BITMIME"]));

        // sending consumes the message, a second delivery works on a clone
        let message = sealed_message(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        builder(first_addr).build().send(message.clone()).unwrap();
        builder(second_addr).build().send(message).unwrap();

        let first = first.join().unwrap();
        let second = second.join().unwrap();
        assert!(first.data.is_some());
        assert_eq!(first.data, second.data);
    }

    #[cfg(feature = "native-tls")]
    #[test]
    fn opportunistic_without_starttls_stays_plaintext() {
        use missive::transport::smtp::client::{Tls, TlsParameters};

        init_tracing();
        let (addr, server) = serve(accept_all(&["8BITMIME", "PIPELINING"]));

        let message = sealed_message(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        let tls = Tls::Opportunistic(TlsParameters::new("localhost".to_owned()).unwrap());
        builder(addr).tls(tls).build().send(message).unwrap();

        let transcript = server.join().unwrap();
        assert_eq!(
            transcript.commands,
            [
                "EHLO client.test",
                "MAIL FROM:<a@x.com>",
                "RCPT TO:<b@x.com>",
                "DATA",
                "QUIT"
            ]
        );
    }

    #[test]
    fn recipients_in_envelope_order() {
        init_tracing();
        let (addr, server) = serve(accept_all(&[]));

        let message = sealed_message(
            Envelope::new("Sender <a@x.com>", "Test")
                .with_to(["To <to@x.com>"])
                .with_cc(["cc@x.com"])
                .with_bcc(["bcc@x.com"]),
        );
        builder(addr).build().send(message).unwrap();

        let transcript = server.join().unwrap();
        assert_eq!(
            transcript.commands[1..5],
            [
                "MAIL FROM:<a@x.com>",
                "RCPT TO:<to@x.com>",
                "RCPT TO:<cc@x.com>",
                "RCPT TO:<bcc@x.com>",
            ]
        );
    }

    #[test]
    fn auth_plain() {
        init_tracing();
        let (addr, server) = serve(|command: &str| {
            if command.starts_with("EHLO") {
                ehlo_reply(&["AUTH LOGIN PLAIN"])
            } else if command.starts_with("AUTH") {
                "235 2.7.0 Authentication successful\r\n".to_owned()
            } else if command == "QUIT" {
                "221 2.0.0 bye\r\n".to_owned()
            } else {
                "250 2.0.0 ok\r\n".to_owned()
            }
        });

        let message = sealed_message(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        builder(addr)
            .credentials(Credentials::new("user".to_owned(), "password".to_owned()))
            .build()
            .send(message)
            .unwrap();

        let transcript = server.join().unwrap();
        assert_eq!(
            transcript.commands[..3],
            [
                "EHLO client.test",
                "AUTH PLAIN AHVzZXIAcGFzc3dvcmQ=",
                "MAIL FROM:<a@x.com>"
            ]
        );
    }

    #[test]
    fn auth_login_challenges() {
        init_tracing();
        let (addr, server) = serve(|command: &str| match command {
            c if c.starts_with("EHLO") => ehlo_reply(&["AUTH=LOGIN"]),
            "AUTH LOGIN" => "334 VXNlcm5hbWU6\r\n".to_owned(),
            // "user"
            "dXNlcg==" => "334 UGFzc3dvcmQ6\r\n".to_owned(),
            // "password"
            "cGFzc3dvcmQ=" => "235 2.7.0 Authentication successful\r\n".to_owned(),
            "QUIT" => "221 2.0.0 bye\r\n".to_owned(),
            _ => "250 2.0.0 ok\r\n".to_owned(),
        });

        let credentials = Credentials::new("user".to_owned(), "password".to_owned())
            .with_mechanisms(&[Mechanism::Login]);
        let message = sealed_message(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        builder(addr)
            .credentials(credentials)
            .build()
            .send(message)
            .unwrap();

        let transcript = server.join().unwrap();
        assert_eq!(
            transcript.commands[..5],
            [
                "EHLO client.test",
                "AUTH LOGIN",
                "dXNlcg==",
                "cGFzc3dvcmQ=",
                "MAIL FROM:<a@x.com>"
            ]
        );
    }

    #[test]
    fn rejected_credentials() {
        init_tracing();
        let (addr, server) = serve(|command: &str| {
            if command.starts_with("EHLO") {
                ehlo_reply(&["AUTH PLAIN"])
            } else if command.starts_with("AUTH") {
                "535 5.7.8 Authentication credentials invalid\r\n".to_owned()
            } else if command == "QUIT" {
                "221 2.0.0 bye\r\n".to_owned()
            } else {
                "250 2.0.0 ok\r\n".to_owned()
            }
        });

        let message = sealed_message(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        let err = builder(addr)
            .credentials(Credentials::new("user".to_owned(), "wrong".to_owned()))
            .build()
            .send(message)
            .unwrap_err();
        assert!(err.is_authentication());

        let transcript = server.join().unwrap();
        assert_eq!(
            transcript.commands,
            ["EHLO client.test", "AUTH PLAIN AHVzZXIAd3Jvbmc=", "QUIT"]
        );
    }

    #[test]
    fn rejected_recipient_aborts_the_send() {
        init_tracing();
        let (addr, server) = serve(|command: &str| match command {
            c if c.starts_with("EHLO") => ehlo_reply(&[]),
            "RCPT TO:<c@x.com>" => "550 5.1.1 no such user\r\n".to_owned(),
            "QUIT" => "221 2.0.0 bye\r\n".to_owned(),
            _ => "250 2.0.0 ok\r\n".to_owned(),
        });

        let message = sealed_message(
            Envelope::new("a@x.com", "Test").with_to(["b@x.com", "c@x.com", "d@x.com"]),
        );
        let err = builder(addr).build().send(message).unwrap_err();
        assert!(err.is_permanent());
        assert_eq!(err.status().map(|code| code.to_string()).as_deref(), Some("550"));

        let transcript = server.join().unwrap();
        assert_eq!(
            transcript.commands,
            [
                "EHLO client.test",
                "MAIL FROM:<a@x.com>",
                "RCPT TO:<b@x.com>",
                "RCPT TO:<c@x.com>",
                "QUIT"
            ]
        );
        assert!(transcript.data.is_none());
    }

    #[cfg(feature = "native-tls")]
    #[test]
    fn failed_starttls_sends_nothing() {
        use missive::transport::smtp::client::{Tls, TlsParameters};

        init_tracing();
        let (addr, server) = serve(|command: &str| match command {
            c if c.starts_with("EHLO") => ehlo_reply(&["STARTTLS", "AUTH PLAIN"]),
            "STARTTLS" => "454 4.7.0 TLS not available\r\n".to_owned(),
            "QUIT" => "221 2.0.0 bye\r\n".to_owned(),
            _ => "250 2.0.0 ok\r\n".to_owned(),
        });

        let message = sealed_message(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        let tls = Tls::Opportunistic(TlsParameters::new("localhost".to_owned()).unwrap());
        let err = builder(addr)
            .tls(tls)
            .credentials(Credentials::new("user".to_owned(), "password".to_owned()))
            .build()
            .send(message)
            .unwrap_err();
        assert!(err.is_transient());

        let transcript = server.join().unwrap();
        assert_eq!(
            transcript.commands,
            ["EHLO client.test", "STARTTLS", "QUIT"]
        );
    }

    #[cfg(feature = "native-tls")]
    #[test]
    fn required_starttls_not_advertised() {
        use missive::transport::smtp::client::{Tls, TlsParameters};

        init_tracing();
        let (addr, server) = serve(accept_all(&["8BITMIME"]));

        let message = sealed_message(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        let tls = Tls::Required(TlsParameters::new("localhost".to_owned()).unwrap());
        let err = builder(addr).tls(tls).build().send(message).unwrap_err();
        assert!(err.is_client());

        let transcript = server.join().unwrap();
        assert_eq!(transcript.commands, ["EHLO client.test", "QUIT"]);
    }

    #[test]
    fn helo_fallback() {
        init_tracing();
        let (addr, server) = serve(|command: &str| match command {
            c if c.starts_with("EHLO") => "502 5.5.2 command not recognized\r\n".to_owned(),
            c if c.starts_with("HELO") => "250 mock.test\r\n".to_owned(),
            "QUIT" => "221 2.0.0 bye\r\n".to_owned(),
            _ => "250 2.0.0 ok\r\n".to_owned(),
        });

        let message = sealed_message(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        builder(addr).build().send(message).unwrap();

        let transcript = server.join().unwrap();
        assert_eq!(
            transcript.commands[..3],
            ["EHLO client.test", "HELO client.test", "MAIL FROM:<a@x.com>"]
        );
    }

    #[test]
    fn eight_bit_payload() {
        init_tracing();
        let (addr, server) = serve(accept_all(&["8BITMIME"]));

        let envelope = Envelope::new("a@x.com", "Test").with_to(["b@x.com"]);
        builder(addr)
            .build()
            .send_raw(&envelope, "Subject: Test\r\n\r\nhéllo\r\n".as_bytes())
            .unwrap();

        let transcript = server.join().unwrap();
        assert_eq!(transcript.commands[1], "MAIL FROM:<a@x.com> BODY=8BITMIME");
        assert_eq!(
            transcript.data.as_deref(),
            Some("Subject: Test\r\n\r\nhéllo\r\n")
        );
    }

    #[test]
    fn eight_bit_payload_unsupported() {
        init_tracing();
        let (addr, server) = serve(accept_all(&[]));

        let envelope = Envelope::new("a@x.com", "Test").with_to(["b@x.com"]);
        let err = builder(addr)
            .build()
            .send_raw(&envelope, "héllo".as_bytes())
            .unwrap_err();
        assert!(err.is_client());

        let transcript = server.join().unwrap();
        assert_eq!(transcript.commands, ["EHLO client.test", "QUIT"]);
    }

    #[test]
    fn dot_stuffing() {
        init_tracing();
        let (addr, server) = serve(accept_all(&[]));

        let envelope = Envelope::new("a@x.com", "Test").with_to(["b@x.com"]);
        builder(addr)
            .build()
            .send_raw(&envelope, b"Subject: dots\r\n\r\n.\r\n..twice\r\nend")
            .unwrap();

        // the server sees the stuffed lines and the CRLF added before the terminator
        let transcript = server.join().unwrap();
        assert_eq!(
            transcript.data.as_deref(),
            Some("Subject: dots\r\n\r\n..\r\n...twice\r\nend\r\n")
        );
    }

    #[test]
    fn unsealed_message_is_not_sent() {
        let mut message = Message::new(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        message.text("hello").unwrap();

        // nothing listens there, the send must fail before connecting
        let err = SmtpTransport::builder_dangerous("127.0.0.1")
            .port(9)
            .build()
            .send(message)
            .unwrap_err();
        assert!(err.is_composition());
    }

    #[test]
    fn connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let message = sealed_message(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        let err = builder(addr).build().send(message).unwrap_err();
        assert!(err.is_connection());
    }

    #[test]
    fn noop_connection_check() {
        init_tracing();
        let (addr, server) = serve(accept_all(&[]));

        assert!(builder(addr).build().test_connection().unwrap());

        let transcript = server.join().unwrap();
        assert_eq!(transcript.commands, ["EHLO client.test", "NOOP", "QUIT"]);
    }

    #[test]
    fn transport_from_url() {
        init_tracing();
        let (addr, server) = serve(accept_all(&[]));

        let message = sealed_message(Envelope::new("a@x.com", "Test").with_to(["b@x.com"]));
        SmtpTransport::from_url(&format!("smtp://{addr}/relay.client.test"))
            .unwrap()
            .build()
            .send(message)
            .unwrap();

        let transcript = server.join().unwrap();
        assert_eq!(transcript.commands[0], "EHLO relay.client.test");
    }
}
